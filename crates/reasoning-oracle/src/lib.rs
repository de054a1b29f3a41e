//! Reasoning oracle: the remote service that interprets a rendered capture
//! plus textual context and returns structured or free-text output.
//!
//! Treated as a black box behind [`ReasoningOracle`]; transport and schema
//! failures propagate and are session-fatal.

mod errors;
mod mock;
mod openai;
pub mod prompts;
mod provider;

pub use errors::OracleError;
pub use mock::MockOracle;
pub use openai::{OpenAiConfig, OpenAiOracle};
pub use provider::{ActionRequest, Reasoning, ReasoningOracle};
