//! Core metadata types for agent descriptors

use serde::{Deserialize, Serialize};

/// Model tier an agent runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Cheap and fast
    Haiku,
    /// Balanced
    #[default]
    Sonnet,
    /// Expensive, deep reasoning
    Opus,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Haiku => "haiku",
            ModelType::Sonnet => "sonnet",
            ModelType::Opus => "opus",
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "haiku" => Ok(ModelType::Haiku),
            "sonnet" => Ok(ModelType::Sonnet),
            "opus" => Ok(ModelType::Opus),
            other => Err(format!("unknown model type: {other}")),
        }
    }
}

/// Cost tier for agent usage
///
/// Ordered from cheapest to most expensive; the router prefers the cheaper
/// agent when two candidates score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentCost {
    Free,
    Cheap,
    Expensive,
}

impl AgentCost {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCost::Free => "FREE",
            AgentCost::Cheap => "CHEAP",
            AgentCost::Expensive => "EXPENSIVE",
        }
    }
}

impl std::fmt::Display for AgentCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentCost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FREE" => Ok(AgentCost::Free),
            "CHEAP" => Ok(AgentCost::Cheap),
            "EXPENSIVE" => Ok(AgentCost::Expensive),
            other => Err(format!("unknown cost tier: {other}")),
        }
    }
}

/// Agent category for routing and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentCategory {
    /// Search and discovery
    Exploration,
    /// Domain-specific implementation
    Specialist,
    /// Strategic consultation (read-only)
    Advisor,
    /// General purpose helpers
    Utility,
    /// Multi-agent coordination
    Orchestration,
    /// Strategic planning
    Planner,
    /// Plan/work review
    Reviewer,
}

impl AgentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::Exploration => "exploration",
            AgentCategory::Specialist => "specialist",
            AgentCategory::Advisor => "advisor",
            AgentCategory::Utility => "utility",
            AgentCategory::Orchestration => "orchestration",
            AgentCategory::Planner => "planner",
            AgentCategory::Reviewer => "reviewer",
        }
    }

    /// Get the default model for this category
    pub fn default_model(&self) -> ModelType {
        match self {
            AgentCategory::Exploration => ModelType::Haiku,
            AgentCategory::Specialist => ModelType::Sonnet,
            AgentCategory::Advisor => ModelType::Opus,
            AgentCategory::Utility => ModelType::Haiku,
            AgentCategory::Orchestration => ModelType::Sonnet,
            AgentCategory::Planner => ModelType::Opus,
            AgentCategory::Reviewer => ModelType::Opus,
        }
    }

    /// Read-only consultants may never hold a file-mutation tool
    pub fn is_read_only(&self) -> bool {
        matches!(self, AgentCategory::Advisor)
    }
}

impl std::fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exploration" => Ok(AgentCategory::Exploration),
            "specialist" => Ok(AgentCategory::Specialist),
            "advisor" => Ok(AgentCategory::Advisor),
            "utility" => Ok(AgentCategory::Utility),
            "orchestration" => Ok(AgentCategory::Orchestration),
            "planner" => Ok(AgentCategory::Planner),
            "reviewer" => Ok(AgentCategory::Reviewer),
            other => Err(format!("unknown agent category: {other}")),
        }
    }
}

/// Trigger condition for delegation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationTrigger {
    /// Domain or area this trigger applies to
    pub domain: String,
    /// Condition that triggers delegation
    pub trigger: String,
}

impl DelegationTrigger {
    pub fn new(domain: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            trigger: trigger.into(),
        }
    }
}

/// Routing metadata attached to every agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    /// Agent category
    pub category: AgentCategory,
    /// Cost tier
    pub cost: AgentCost,
    /// Short alias for prompts and hand-off directives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_alias: Option<String>,
    /// Conditions that trigger delegation to this agent
    #[serde(default)]
    pub triggers: Vec<DelegationTrigger>,
    /// When to use this agent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_when: Vec<String>,
    /// When NOT to use this agent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avoid_when: Vec<String>,
}

impl AgentMetadata {
    pub fn new(category: AgentCategory, cost: AgentCost) -> Self {
        Self {
            category,
            cost,
            prompt_alias: None,
            triggers: Vec::new(),
            use_when: Vec::new(),
            avoid_when: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.prompt_alias = Some(alias.into());
        self
    }

    pub fn trigger(mut self, domain: impl Into<String>, trigger: impl Into<String>) -> Self {
        self.triggers.push(DelegationTrigger::new(domain, trigger));
        self
    }

    pub fn use_when<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.use_when.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn avoid_when<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avoid_when.extend(items.into_iter().map(Into::into));
        self
    }
}
