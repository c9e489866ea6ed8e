//! Agent descriptor types

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::tool::ToolClass;
use crate::types::{AgentCategory, AgentCost, AgentMetadata, ModelType};

/// Static configuration record describing one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Agent name/identifier
    pub name: String,
    /// Short description for agent selection
    pub description: String,
    /// System prompt, handed to the model verbatim
    pub prompt: String,
    /// Exhaustive allowlist of tools the agent may invoke
    #[serde(deserialize_with = "dedup_tools")]
    pub tools: Vec<String>,
    /// Model tier
    pub model: ModelType,
    /// Routing metadata
    pub metadata: AgentMetadata,
}

impl AgentDescriptor {
    /// Create a new descriptor with no tools
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
        metadata: AgentMetadata,
    ) -> Self {
        let model = metadata.category.default_model();
        Self {
            name: name.into(),
            description: description.into(),
            prompt: prompt.into(),
            tools: Vec::new(),
            model,
            metadata,
        }
    }

    /// Set tools for this agent; duplicates are dropped, first occurrence wins
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = dedup(tools.into_iter().map(Into::into));
        self
    }

    /// Set model for this agent
    pub fn with_model(mut self, model: ModelType) -> Self {
        self.model = model;
        self
    }

    pub fn category(&self) -> AgentCategory {
        self.metadata.category
    }

    pub fn cost(&self) -> AgentCost {
        self.metadata.cost
    }

    pub fn prompt_alias(&self) -> Option<&str> {
        self.metadata.prompt_alias.as_deref()
    }

    /// Whether `tool` is in the allowlist (exact token match)
    pub fn allows(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == tool)
    }

    /// Tools in the allowlist that can mutate files
    pub fn mutation_tools(&self) -> impl Iterator<Item = &str> {
        self.tools
            .iter()
            .map(String::as_str)
            .filter(|t| ToolClass::classify(t).is_mutation())
    }
}

fn dedup(tools: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tool in tools {
        if !out.contains(&tool) {
            out.push(tool);
        }
    }
    out
}

fn dedup_tools<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(dedup(raw.into_iter()))
}

/// Agent override configuration for customization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AgentOverrideConfig {
    /// Override model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Enable/disable agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Append to prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_append: Option<String>,
}

/// Map of agent overrides
pub type AgentOverrides = HashMap<String, AgentOverrideConfig>;
