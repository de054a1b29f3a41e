//! Shared primitives for the PriceScout agent workspace.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod tree;

pub use tree::{CollapsedElement, SectionTree};

/// Identifier for one agent run. Session state is created at loop start and
/// discarded at terminal action or unrecoverable error.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a persisted rendered capture, as returned by the storage sink.
///
/// Exactly one artifact is "current" per session; each capture produces a new
/// locator that replaces the previous one.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ArtifactLocator(pub String);

impl ArtifactLocator {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ArtifactLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArtifactLocator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One completed reason/act/observe iteration of the agent loop.
///
/// Entries are append-only and immutable once recorded; the full sequence is
/// rendered back into the oracle prompt on every turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// The oracle's stated rationale, kept opaque.
    pub thought: String,
    /// Name of the action that was taken.
    pub action: String,
    /// Action argument as the oracle supplied it (may be empty).
    pub input: String,
    /// Textual result returned by the action handler.
    pub observation: String,
}

impl TranscriptEntry {
    pub fn new(
        thought: impl Into<String>,
        action: impl Into<String>,
        input: impl Into<String>,
        observation: impl Into<String>,
    ) -> Self {
        Self {
            thought: thought.into(),
            action: action.into(),
            input: input.into(),
            observation: observation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn artifact_locator_roundtrip() {
        let locator = ArtifactLocator::from("https://bucket.s3.amazonaws.com/a.png".to_string());
        assert_eq!(locator.as_str(), "https://bucket.s3.amazonaws.com/a.png");
        assert_eq!(locator.to_string(), locator.clone().into_string());
    }
}
