//! EVAS - agent registry and router
//!
//! [`Runtime`] wires the configured agent catalog into a registry, a router,
//! a capability gate and a hand-off coordinator. The `evas` binary exposes
//! the same operations on the command line.

pub mod commands;
pub mod runtime;

pub use commands::{Cli, Commands};
pub use runtime::Runtime;
