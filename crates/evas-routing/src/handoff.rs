//! Hand-off coordination
//!
//! Agent output is scanned for a delegation directive; when one is found the
//! target is resolved through the registry and the directive payload becomes
//! the target's task. Each task owns a [`HandoffChain`] recording the agents
//! it has passed through, so a delegation loop is caught the moment an agent
//! would be visited twice.

use std::fmt;
use std::sync::Arc;

use evas_agents::AgentRegistry;
use evas_core::{AgentDescriptor, DirectiveParser, HandoffDirective};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    #[error("hand-off cycle: {agent} already handled this task ({chain}); delegation could not be resolved and needs manual intervention")]
    Cycle { agent: String, chain: HandoffChain },

    #[error("hand-off target '{0}' is not a registered agent; delegation could not be resolved and needs manual intervention")]
    NotFound(String),

    #[error("hand-off chain exceeds {max_depth} delegations ({chain}); delegation could not be resolved and needs manual intervention")]
    DepthExceeded { max_depth: usize, chain: HandoffChain },
}

/// Agents a single task has visited, origin first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandoffChain {
    agents: Vec<String>,
}

impl HandoffChain {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            agents: vec![origin.into()],
        }
    }

    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    pub fn origin(&self) -> &str {
        &self.agents[0]
    }

    /// Agent currently holding the task
    pub fn current(&self) -> &str {
        self.agents.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of hand-offs so far
    pub fn depth(&self) -> usize {
        self.agents.len() - 1
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.agents.iter().any(|a| a == agent)
    }
}

impl fmt::Display for HandoffChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.agents.join(" -> "))
    }
}

/// A resolved hand-off, ready to run
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub from: String,
    pub target: Arc<AgentDescriptor>,
    pub directive: HandoffDirective,
    /// Task text for the target agent
    pub task: String,
}

/// Parses and dispatches hand-off directives
#[derive(Debug, Clone)]
pub struct HandoffCoordinator {
    registry: Arc<AgentRegistry>,
    parser: DirectiveParser,
    max_depth: usize,
}

impl HandoffCoordinator {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self {
            registry,
            parser: DirectiveParser::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_parser(mut self, parser: DirectiveParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parser(&self) -> &DirectiveParser {
        &self.parser
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Open a chain for a task first handled by `origin` (name or alias)
    pub fn start_chain(&self, origin: &str) -> Result<HandoffChain, HandoffError> {
        let agent = self
            .registry
            .resolve(origin)
            .ok_or_else(|| HandoffError::NotFound(origin.to_string()))?;
        Ok(HandoffChain::new(agent.name.clone()))
    }

    /// First directive in `output`, or `None` when the agent did not delegate
    pub fn parse_handoff(&self, output: &str) -> Option<HandoffDirective> {
        self.parser.parse(output)
    }

    /// Resolve `directive` and extend `chain`; the chain is untouched on error
    pub fn dispatch(
        &self,
        chain: &mut HandoffChain,
        directive: &HandoffDirective,
    ) -> Result<Dispatch, HandoffError> {
        let target = self
            .registry
            .resolve(&directive.target)
            .ok_or_else(|| HandoffError::NotFound(directive.target.clone()))?;

        if chain.contains(&target.name) {
            return Err(HandoffError::Cycle {
                agent: target.name.clone(),
                chain: chain.clone(),
            });
        }
        if chain.depth() >= self.max_depth {
            return Err(HandoffError::DepthExceeded {
                max_depth: self.max_depth,
                chain: chain.clone(),
            });
        }

        let from = chain.current().to_string();
        chain.agents.push(target.name.clone());

        let task = match directive.payload.to_task_text() {
            text if text.is_empty() => format!("{} from {from}", directive.kind.as_str()),
            text => text,
        };

        tracing::info!(
            from = %from,
            to = %target.name,
            kind = directive.kind.as_str(),
            depth = chain.depth(),
            "dispatching hand-off"
        );

        Ok(Dispatch {
            from,
            target,
            directive: directive.clone(),
            task,
        })
    }

    /// Parse `output` and dispatch its directive, if any
    pub fn on_agent_output(
        &self,
        chain: &mut HandoffChain,
        output: &str,
    ) -> Result<Option<Dispatch>, HandoffError> {
        match self.parse_handoff(output) {
            Some(directive) => self.dispatch(chain, &directive).map(Some),
            None => Ok(None),
        }
    }
}
