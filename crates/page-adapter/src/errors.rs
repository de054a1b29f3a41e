use thiserror::Error;

/// Errors emitted by the page adapter.
#[derive(Debug, Error)]
pub enum PageError {
    /// Browser process could not be started or the initial page not opened.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Navigation did not complete within the budget or was rejected.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A script evaluation against the live page failed.
    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    /// Rasterization failed.
    #[error("screenshot failed: {0}")]
    Screenshot(String),

    /// Reading serialized page content failed.
    #[error("page content unavailable: {0}")]
    Content(String),

    /// The browser was already closed.
    #[error("browser closed")]
    Closed,
}
