//! Allowlist enforcement for agent tool invocations

use std::sync::Arc;

use chrono::Utc;
use evas_agents::AgentRegistry;
use evas_core::{AgentDescriptor, ToolClass};
use serde_json::Value;
use thiserror::Error;

use crate::audit::{summarize_args, AuditLog, DenialRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("agent {agent} is not permitted to use tool {tool}")]
    CapabilityDenied { agent: String, tool: String },

    #[error("unknown agent: {0}")]
    UnknownAgent(String),
}

/// Failure of [`CapabilityGate::invoke`]
#[derive(Error, Debug)]
pub enum InvokeError<E> {
    #[error(transparent)]
    Denied(#[from] GateError),

    #[error("tool execution failed: {0}")]
    Tool(E),
}

/// Proof that `agent` may call `tool`
#[derive(Debug, Clone)]
pub struct Grant {
    agent: Arc<AgentDescriptor>,
    tool: String,
    class: ToolClass,
}

impl Grant {
    pub fn agent(&self) -> &AgentDescriptor {
        &self.agent
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn class(&self) -> &ToolClass {
        &self.class
    }
}

/// Checks tool invocations against each agent's declared allowlist
#[derive(Debug, Clone)]
pub struct CapabilityGate {
    registry: Arc<AgentRegistry>,
    audit: Arc<AuditLog>,
}

impl CapabilityGate {
    pub fn new(registry: Arc<AgentRegistry>, audit: Arc<AuditLog>) -> Self {
        Self { registry, audit }
    }

    pub fn audit_log(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    pub fn authorize(&self, agent: &str, tool: &str) -> Result<Grant, GateError> {
        self.authorize_with_args(agent, tool, &Value::Null)
    }

    /// Like [`authorize`](Self::authorize), with `args` kept in the audit record
    pub fn authorize_with_args(
        &self,
        agent: &str,
        tool: &str,
        args: &Value,
    ) -> Result<Grant, GateError> {
        let decision = self.decide(agent, tool);
        if let Err(err) = &decision {
            self.record_denial(agent, tool, args, err);
        }
        decision
    }

    /// Run `executor` only when `agent` is permitted to use `tool`
    pub fn invoke<T, E, F>(
        &self,
        agent: &str,
        tool: &str,
        args: &Value,
        executor: F,
    ) -> Result<T, InvokeError<E>>
    where
        F: FnOnce(&Grant, &Value) -> Result<T, E>,
    {
        let grant = self.authorize_with_args(agent, tool, args)?;
        executor(&grant, args).map_err(InvokeError::Tool)
    }

    fn decide(&self, agent: &str, tool: &str) -> Result<Grant, GateError> {
        let descriptor = self
            .registry
            .get(agent)
            .map_err(|_| GateError::UnknownAgent(agent.to_string()))?;

        if !descriptor.allows(tool) {
            return Err(GateError::CapabilityDenied {
                agent: agent.to_string(),
                tool: tool.to_string(),
            });
        }

        Ok(Grant {
            agent: descriptor,
            tool: tool.to_string(),
            class: ToolClass::classify(tool),
        })
    }

    fn record_denial(&self, agent: &str, tool: &str, args: &Value, err: &GateError) {
        let class = ToolClass::classify(tool);
        tracing::warn!(agent, tool, class = %class, "tool invocation denied: {err}");

        self.audit.record(DenialRecord {
            agent: agent.to_string(),
            tool: tool.to_string(),
            class: class.to_string(),
            args_summary: summarize_args(args),
            timestamp: Utc::now(),
        });
    }
}
