//! Agent selection and hand-off dispatch
//!
//! The [`Router`] ranks registered agents for a task text using their
//! triggers, `useWhen` and description, with `avoidWhen` acting as a hard
//! disqualifier. The [`HandoffCoordinator`] follows delegation directives in
//! agent output and guards each task's chain against cycles.

pub mod handoff;
pub mod router;
pub mod scorer;
pub mod signals;
pub mod types;

pub use handoff::{Dispatch, HandoffChain, HandoffCoordinator, HandoffError, DEFAULT_MAX_DEPTH};
pub use router::{Router, RouterError};
pub use scorer::AgentProfile;
pub use signals::{tokenize, Phrase};
pub use types::{Disqualification, MatchedSignal, RankedAgent, RoutingConfig, Selection, SignalKind};
