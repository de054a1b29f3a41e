//! PriceScout agent core: the capture pipeline, the collapsed-section
//! expansion executor, and the ReAct control loop that ties page captures,
//! the reasoning oracle and the storage sink into one sequential session.

pub mod agent_loop;
mod capture;
mod errors;
mod expand;

pub use agent_loop::{
    parse_expand_input, AgentAction, AgentLoopConfig, PriceScoutSession, SessionOutcome,
    SessionReport,
};
pub use capture::CapturePipeline;
pub use errors::AgentError;
pub use expand::{expand_path, expansion_script};
