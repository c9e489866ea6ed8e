//! Load-time integrity checks

use std::fmt;

use evas_core::{AgentDescriptor, DirectiveParser, ToolClass};
use serde::Serialize;
use thiserror::Error;

/// A single integrity violation found while validating the registry
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("agent with empty name")]
    EmptyName,

    #[error("agent '{agent}' declares no tools")]
    EmptyTools { agent: String },

    #[error("advisor '{agent}' lists mutation tool '{tool}' ({class})")]
    MutationToolOnAdvisor {
        agent: String,
        tool: String,
        class: String,
    },

    #[error("agent '{agent}' hands off to unknown agent '{target}' (prompt line {line})")]
    UnknownHandoffTarget {
        agent: String,
        target: String,
        line: usize,
    },

    #[error("alias '{alias}' of agent '{agent}' collides with agent '{other}'")]
    DuplicateAlias {
        agent: String,
        alias: String,
        other: String,
    },
}

impl Violation {
    /// Name of the offending agent, empty for [`Violation::EmptyName`]
    pub fn agent(&self) -> &str {
        match self {
            Violation::EmptyName => "",
            Violation::EmptyTools { agent }
            | Violation::MutationToolOnAdvisor { agent, .. }
            | Violation::UnknownHandoffTarget { agent, .. }
            | Violation::DuplicateAlias { agent, .. } => agent,
        }
    }
}

/// Every violation found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for v in &self.violations {
            write!(f, "\n  - {v}")?;
        }
        Ok(())
    }
}

/// Check one descriptor; `resolves` answers whether a hand-off target exists
pub(crate) fn check_descriptor(
    agent: &AgentDescriptor,
    parser: &DirectiveParser,
    resolves: impl Fn(&str) -> bool,
    out: &mut Vec<Violation>,
) {
    if agent.name.trim().is_empty() {
        out.push(Violation::EmptyName);
    }

    if agent.tools.is_empty() {
        out.push(Violation::EmptyTools {
            agent: agent.name.clone(),
        });
    }

    if agent.category().is_read_only() {
        for tool in agent.mutation_tools() {
            out.push(Violation::MutationToolOnAdvisor {
                agent: agent.name.clone(),
                tool: tool.to_string(),
                class: ToolClass::classify(tool).to_string(),
            });
        }
    }

    for directive in parser.parse_all(&agent.prompt) {
        if !resolves(&directive.target) {
            out.push(Violation::UnknownHandoffTarget {
                agent: agent.name.clone(),
                target: directive.target,
                line: directive.line,
            });
        }
    }
}

/// Aliases must not equal, ignoring case, another agent's name or alias
pub(crate) fn check_aliases<'a>(
    agents: impl IntoIterator<Item = &'a AgentDescriptor>,
    out: &mut Vec<Violation>,
) {
    let agents: Vec<&AgentDescriptor> = agents.into_iter().collect();
    for (i, agent) in agents.iter().enumerate() {
        let Some(alias) = agent.prompt_alias() else {
            continue;
        };
        for (j, other) in agents.iter().enumerate() {
            if i == j {
                continue;
            }
            let name_clash = other.name.eq_ignore_ascii_case(alias);
            // alias pairs are reported once, on the later agent
            let alias_clash = j < i
                && other
                    .prompt_alias()
                    .is_some_and(|a| a.eq_ignore_ascii_case(alias));
            if name_clash || alias_clash {
                out.push(Violation::DuplicateAlias {
                    agent: agent.name.clone(),
                    alias: alias.to_string(),
                    other: other.name.clone(),
                });
            }
        }
    }
}
