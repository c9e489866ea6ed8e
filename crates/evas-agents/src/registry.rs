use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use evas_core::{AgentCategory, AgentCost, AgentDescriptor, DirectiveParser};
use thiserror::Error;

use crate::validation::{check_aliases, check_descriptor, IntegrityReport};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("agent '{0}' is already registered")]
    DuplicateName(String),

    #[error("agent '{0}' not found")]
    NotFound(String),

    #[error("registry integrity check failed: {0}")]
    Integrity(IntegrityReport),
}

/// Optional constraints for [`AgentRegistry::list`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentFilter {
    pub category: Option<AgentCategory>,
    pub cost: Option<AgentCost>,
}

impl AgentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: AgentCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn cost(mut self, cost: AgentCost) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn matches(&self, agent: &AgentDescriptor) -> bool {
        self.category.map_or(true, |c| agent.category() == c)
            && self.cost.map_or(true, |c| agent.cost() == c)
    }
}

/// Name-keyed store of agent descriptors
///
/// Built once at startup and then shared read-only; iteration is always in
/// name order.
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: BTreeMap<String, Arc<AgentDescriptor>>,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.names())
            .finish()
    }
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every descriptor, then validate the result
    pub fn load(
        descriptors: impl IntoIterator<Item = AgentDescriptor>,
        parser: &DirectiveParser,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        registry.validate_with(parser)?;

        tracing::info!(agents = registry.len(), "agent registry loaded");
        Ok(registry)
    }

    /// Add a descriptor; the registry is untouched when the name is taken
    pub fn register(&mut self, descriptor: AgentDescriptor) -> Result<(), RegistryError> {
        if self.agents.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }
        tracing::debug!(agent = %descriptor.name, "registering agent");
        self.agents
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<AgentDescriptor>, RegistryError> {
        self.agents
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Look up by exact name, falling back to a case-insensitive prompt alias
    pub fn resolve(&self, name_or_alias: &str) -> Option<Arc<AgentDescriptor>> {
        if let Some(agent) = self.agents.get(name_or_alias) {
            return Some(agent.clone());
        }
        self.agents
            .values()
            .find(|a| {
                a.prompt_alias()
                    .is_some_and(|alias| alias.eq_ignore_ascii_case(name_or_alias))
            })
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AgentDescriptor>> {
        self.agents.values()
    }

    pub fn list(&self, filter: AgentFilter) -> impl Iterator<Item = &Arc<AgentDescriptor>> {
        self.agents.values().filter(move |a| filter.matches(a))
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        self.validate_with(&DirectiveParser::default())
    }

    /// Check every descriptor, reporting all violations at once
    pub fn validate_with(&self, parser: &DirectiveParser) -> Result<(), RegistryError> {
        let mut violations = Vec::new();
        for agent in self.agents.values() {
            check_descriptor(
                agent,
                parser,
                |target| self.resolve(target).is_some(),
                &mut violations,
            );
        }
        check_aliases(self.agents.values().map(Arc::as_ref), &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Integrity(IntegrityReport { violations }))
        }
    }
}
