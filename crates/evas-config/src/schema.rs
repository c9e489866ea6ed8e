use evas_core::{AgentMetadata, AgentOverrides, DEFAULT_IMPLEMENTER};
use evas_permissions::DEFAULT_AUDIT_CAPACITY;
use evas_routing::{RoutingConfig, DEFAULT_MAX_DEPTH};
use evas_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};

/// Main EVAS configuration
///
/// Configuration is loaded from (in priority order):
/// 1. `evas.jsonc` - JSON with comments
/// 2. `evas.json` - Standard JSON
/// 3. `evas.yml` / `evas.yaml` - YAML format
///
/// Also checks hidden variants (`.evas.*`) and `~/.config/evas/` for global config.
/// Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvasConfig {
    #[serde(default)]
    pub agents: AgentSettings,

    /// Router weights and avoid threshold
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub handoff: HandoffSettings,

    #[serde(default)]
    pub audit: AuditSettings,

    /// Log level and format, overridden by `RUST_LOG`
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

// ============================================================================
// Agents
// ============================================================================

/// Agent catalog settings
///
/// # Example
///
/// ```yaml
/// agents:
///   prompts_dir: ./prompts
///   overrides:
///     librarian:
///       model: haiku
///     cosmetic-librarian:
///       prompt_append: "Prefer KCID sources."
///   custom:
///     - name: packaging-advisor
///       description: Packaging compatibility consultant
///       prompt_file: ./prompts/packaging-advisor.md
///       tools: [Read, Grep, Glob]
///       metadata:
///         category: advisor
///         cost: CHEAP
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Directory whose `<name>.md` files replace the embedded prompts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts_dir: Option<String>,

    /// Per-agent overrides keyed by agent name
    #[serde(default)]
    pub overrides: AgentOverrides,

    /// Additional agents registered next to the built-in catalog
    #[serde(default)]
    pub custom: Vec<CustomAgentConfig>,
}

/// A user-defined agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAgentConfig {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Inline prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Prompt file, relative to the configuration file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_file: Option<String>,

    pub tools: Vec<String>,

    /// Model tier; defaults to the category's tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub metadata: AgentMetadata,
}

// ============================================================================
// Hand-off, audit
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffSettings {
    /// Maximum hand-offs per task (default: 8)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Agent receiving `IMPLEMENT:` directives (default: cosmetic-junior)
    #[serde(default = "default_implementer")]
    pub implementer: String,
}

impl Default for HandoffSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            implementer: default_implementer(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_implementer() -> String {
    DEFAULT_IMPLEMENTER.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Denial records kept in memory (default: 1024)
    #[serde(default = "default_audit_capacity")]
    pub capacity: usize,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            capacity: default_audit_capacity(),
        }
    }
}

fn default_audit_capacity() -> usize {
    DEFAULT_AUDIT_CAPACITY
}
