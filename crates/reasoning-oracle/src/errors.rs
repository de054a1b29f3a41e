use thiserror::Error;

/// Errors emitted by the reasoning oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The HTTP round-trip to the oracle failed.
    #[error("oracle request failed: {0}")]
    Transport(String),

    /// The oracle returned a non-success status.
    #[error("oracle returned {status}: {body}")]
    Api { status: u16, body: String },

    /// A response arrived without any message content.
    #[error("oracle response missing content")]
    MissingContent,

    /// Structured output did not conform to the expected shape.
    #[error("oracle output did not match schema: {0}")]
    Schema(String),
}
