//! EVAS core types
//!
//! Static agent descriptors consumed by the EVAS orchestration host, the
//! capability classes of the tools they declare, and the line-oriented
//! hand-off grammar agents use to delegate work to each other.

mod descriptor;
mod directive;
mod tool;
mod types;

pub use descriptor::*;
pub use directive::*;
pub use tool::*;
pub use types::*;
