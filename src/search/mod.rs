//! Search lifecycle: the state machine and the orchestrator driving it.

mod orchestrator;
mod state;

pub use orchestrator::{Clock, SearchOptions, SearchOrchestrator, SystemClock};
pub use state::SearchState;
