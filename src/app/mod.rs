//! Process-level wiring

pub mod context;
pub mod runner;

pub use context::{ContextError, SimContext};
pub use runner::{MatchRunner, RunOutcome};
