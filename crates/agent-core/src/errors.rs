use thiserror::Error;

use artifact_store::StoreError;
use page_adapter::PageError;
use reasoning_oracle::OracleError;

/// Errors emitted by the agent core. Everything surfacing here is
/// session-fatal; degraded-continue conditions (navigation timeouts,
/// zero-match expansions, stabilization overruns) are logged and absorbed
/// before reaching this type.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("capture failed: {0}")]
    Capture(#[from] PageError),

    #[error("artifact store failed: {0}")]
    Store(#[from] StoreError),

    #[error("oracle failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("failed to encode observation: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("session state error: {0}")]
    Session(&'static str),
}
