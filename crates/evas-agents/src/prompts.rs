//! Embedded agent prompts
//!
//! These prompts are compiled into the binary for standalone operation.

use crate::prompt_loader::PromptTable;

pub static EMBEDDED_PROMPTS: PromptTable = crate::embed_prompts!(
    "explore" => "../prompts/explore.md",
    "librarian" => "../prompts/librarian.md",
    "cosmetic-librarian" => "../prompts/cosmetic-librarian.md",
    "ingredient-explorer" => "../prompts/ingredient-explorer.md",
    "formulation-oracle" => "../prompts/formulation-oracle.md",
    "safety-oracle" => "../prompts/safety-oracle.md",
    "regulatory-oracle" => "../prompts/regulatory-oracle.md",
    "cosmetic-junior" => "../prompts/cosmetic-junior.md",
);

/// Get an embedded prompt by agent name, frontmatter included
pub fn get_embedded_prompt(agent_name: &str) -> Option<&'static str> {
    EMBEDDED_PROMPTS
        .iter()
        .find(|(name, _)| *name == agent_name)
        .map(|(_, content)| *content)
}
