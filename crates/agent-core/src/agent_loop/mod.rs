//! ReAct agent loop: reason, act, observe, repeat.

mod actions;
mod config;
mod session;

pub use actions::{parse_expand_input, AgentAction};
pub use config::AgentLoopConfig;
pub use session::{PriceScoutSession, SessionOutcome, SessionReport};
