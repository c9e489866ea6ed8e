pub mod config;
pub mod definitions;
pub mod prompt_loader;
pub mod prompts;
pub mod registry;
pub mod validation;

pub use crate::config::{apply_overrides, merge_agent_config, parse_model_type, AgentConfigError};
pub use crate::definitions::{
    builtin_descriptors, get_agent_definitions, get_agent_definitions_with_loader,
    BUILTIN_AGENT_NAMES,
};
pub use crate::prompt_loader::{strip_frontmatter, PromptLoader, PromptSource, PromptTable};
pub use crate::prompts::{get_embedded_prompt, EMBEDDED_PROMPTS};
pub use crate::registry::{AgentFilter, AgentRegistry, RegistryError};
pub use crate::validation::{IntegrityReport, Violation};
