//! Capability enforcement for EVAS agents
//!
//! Every tool invocation an agent attempts goes through the [`CapabilityGate`],
//! which checks the agent's declared allowlist and records each denial in a
//! bounded [`AuditLog`].
//!
//! # Example
//!
//! ```ignore
//! use evas_permissions::{AuditLog, CapabilityGate};
//!
//! let gate = CapabilityGate::new(registry, AuditLog::shared(256));
//! gate.authorize("safety-oracle", "Read")?;
//! assert!(gate.authorize("safety-oracle", "Write").is_err());
//! ```

mod audit;
mod gate;

pub use audit::{summarize_args, AuditLog, DenialRecord, DEFAULT_AUDIT_CAPACITY};
pub use gate::{CapabilityGate, GateError, Grant, InvokeError};
