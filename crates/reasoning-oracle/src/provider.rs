//! Oracle trait and the reasoning wire shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pricescout_core_types::{CollapsedElement, TranscriptEntry};

use crate::errors::OracleError;

/// Action the oracle wants taken next. `name` is matched against the closed
/// action set by the loop; anything unrecognized terminates the run
/// gracefully.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

/// One reasoning step: a thought plus the chosen action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reasoning {
    pub thought: String,
    pub action: ActionRequest,
}

impl Reasoning {
    pub fn new(
        thought: impl Into<String>,
        action: impl Into<String>,
        input: Option<String>,
    ) -> Self {
        Self {
            thought: thought.into(),
            action: ActionRequest {
                name: action.into(),
                input,
            },
        }
    }
}

/// Abstraction over the remote reasoning service so providers can be swapped
/// and tests can script responses.
///
/// Every image is passed by locator (the storage sink's public URL), never
/// by raw bytes.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Describe the site from its home-page capture. Called once per
    /// session, before the loop starts.
    async fn describe_site(&self, image: &str) -> Result<String, OracleError>;

    /// Free-text answer naming up to three services with visible prices.
    async fn find_prices(
        &self,
        image: &str,
        site_description: &str,
    ) -> Result<String, OracleError>;

    /// Structured discovery of the next collapsed section, as one
    /// root-to-leaf chain with at most one child per level.
    async fn identify_collapsed(
        &self,
        image: &str,
        site_description: &str,
        known_roots: &[CollapsedElement],
        current_branch: Option<&CollapsedElement>,
    ) -> Result<CollapsedElement, OracleError>;

    /// ReAct decision: given the transcript so far, what to think and do
    /// next.
    async fn next_step(
        &self,
        question: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<Reasoning, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasoning_parses_with_and_without_input() {
        let with_input: Reasoning = serde_json::from_str(
            r#"{"thought":"expand it","action":{"name":"expand_collapsed_elements","input":"{\"label\":\"Surgery\",\"children\":[]}"}}"#,
        )
        .unwrap();
        assert_eq!(with_input.action.name, "expand_collapsed_elements");
        assert!(with_input.action.input.is_some());

        let without_input: Reasoning = serde_json::from_str(
            r#"{"thought":"look at the page","action":{"name":"find_prices"}}"#,
        )
        .unwrap();
        assert_eq!(without_input.action.input, None);
    }

    #[test]
    fn null_input_is_treated_as_absent() {
        let reasoning: Reasoning = serde_json::from_str(
            r#"{"thought":"t","action":{"name":"find_prices","input":null}}"#,
        )
        .unwrap();
        assert_eq!(reasoning.action.input, None);
    }
}
