//! Scripted oracle used for tests and offline development.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use pricescout_core_types::{CollapsedElement, TranscriptEntry};

use crate::errors::OracleError;
use crate::provider::{Reasoning, ReasoningOracle};

/// Deterministic oracle that pops pre-scripted responses per method and
/// records what context it was shown. An exhausted script surfaces as a
/// schema error, which keeps unexpected calls loud in tests.
#[derive(Default)]
pub struct MockOracle {
    descriptions: Mutex<VecDeque<String>>,
    price_answers: Mutex<VecDeque<String>>,
    collapsed: Mutex<VecDeque<CollapsedElement>>,
    steps: Mutex<VecDeque<Reasoning>>,
    seen_images: Mutex<Vec<String>>,
    seen_transcript_lens: Mutex<Vec<usize>>,
    seen_branches: Mutex<Vec<Option<String>>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_description(&self, description: impl Into<String>) {
        self.descriptions.lock().push_back(description.into());
    }

    pub fn push_price_answer(&self, answer: impl Into<String>) {
        self.price_answers.lock().push_back(answer.into());
    }

    pub fn push_collapsed(&self, node: CollapsedElement) {
        self.collapsed.lock().push_back(node);
    }

    pub fn push_step(&self, step: Reasoning) {
        self.steps.lock().push_back(step);
    }

    /// Images the oracle has been shown, in call order.
    pub fn seen_images(&self) -> Vec<String> {
        self.seen_images.lock().clone()
    }

    /// Transcript lengths observed by `next_step`, in call order.
    pub fn seen_transcript_lens(&self) -> Vec<usize> {
        self.seen_transcript_lens.lock().clone()
    }

    /// Current-branch chains observed by `identify_collapsed`.
    pub fn seen_branches(&self) -> Vec<Option<String>> {
        self.seen_branches.lock().clone()
    }

    fn exhausted(method: &str) -> OracleError {
        OracleError::Schema(format!("mock oracle script exhausted for {method}"))
    }
}

#[async_trait]
impl ReasoningOracle for MockOracle {
    async fn describe_site(&self, image: &str) -> Result<String, OracleError> {
        self.seen_images.lock().push(image.to_string());
        self.descriptions
            .lock()
            .pop_front()
            .ok_or_else(|| Self::exhausted("describe_site"))
    }

    async fn find_prices(
        &self,
        image: &str,
        _site_description: &str,
    ) -> Result<String, OracleError> {
        self.seen_images.lock().push(image.to_string());
        self.price_answers
            .lock()
            .pop_front()
            .ok_or_else(|| Self::exhausted("find_prices"))
    }

    async fn identify_collapsed(
        &self,
        image: &str,
        _site_description: &str,
        _known_roots: &[CollapsedElement],
        current_branch: Option<&CollapsedElement>,
    ) -> Result<CollapsedElement, OracleError> {
        self.seen_images.lock().push(image.to_string());
        self.seen_branches
            .lock()
            .push(current_branch.map(CollapsedElement::chain_path));
        self.collapsed
            .lock()
            .pop_front()
            .ok_or_else(|| Self::exhausted("identify_collapsed"))
    }

    async fn next_step(
        &self,
        _question: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<Reasoning, OracleError> {
        self.seen_transcript_lens.lock().push(transcript.len());
        self.steps
            .lock()
            .pop_front()
            .ok_or_else(|| Self::exhausted("next_step"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_pop_in_order() {
        let oracle = MockOracle::new();
        oracle.push_step(Reasoning::new("first", "find_prices", None));
        oracle.push_step(Reasoning::new("second", "done", Some("result".into())));

        let first = oracle.next_step("q", &[]).await.unwrap();
        assert_eq!(first.action.name, "find_prices");
        let second = oracle.next_step("q", &[]).await.unwrap();
        assert_eq!(second.action.name, "done");
        assert!(oracle.next_step("q", &[]).await.is_err());
        assert_eq!(oracle.seen_transcript_lens(), vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn records_images_and_branches() {
        let oracle = MockOracle::new();
        oracle.push_collapsed(CollapsedElement::leaf("Surgery"));

        let branch = CollapsedElement::leaf("Services");
        let node = oracle
            .identify_collapsed("memory://a.png", "desc", &[], Some(&branch))
            .await
            .unwrap();
        assert_eq!(node.label, "Surgery");
        assert_eq!(oracle.seen_images(), vec!["memory://a.png"]);
        assert_eq!(oracle.seen_branches(), vec![Some("Services.".to_string())]);
    }
}
