//! Session state and the reason/act/observe control loop.

use std::sync::Arc;

use tracing::{info, warn};

use artifact_store::ArtifactStore;
use page_adapter::PageDriver;
use pricescout_core_types::{
    ArtifactLocator, CollapsedElement, SectionTree, SessionId, TranscriptEntry,
};
use reasoning_oracle::ReasoningOracle;

use crate::agent_loop::actions::{parse_expand_input, AgentAction};
use crate::agent_loop::config::AgentLoopConfig;
use crate::capture::CapturePipeline;
use crate::errors::AgentError;
use crate::expand::expand_path;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The oracle chose `done`; its input is the final payload.
    Completed { result: Option<String> },
    /// The oracle produced an action outside the known set. Graceful
    /// termination: no handler ran and the terminal handler was not invoked.
    UnknownAction { action: String },
    /// The configured turn bound was hit before a terminal action.
    MaxStepsReached,
}

/// Final report of one agent run.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub steps_taken: u32,
    pub transcript: Vec<TranscriptEntry>,
}

impl SessionReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, SessionOutcome::Completed { .. })
    }
}

/// One agent run against one target URL.
///
/// Owns the session's single page (through the pipeline's driver), the
/// accumulated collapsed-section tree, the branch currently under
/// exploration, and the append-only transcript. Strictly sequential: each
/// turn suspends until the previous capture/oracle round-trip finishes.
pub struct PriceScoutSession {
    id: SessionId,
    url: String,
    driver: Arc<dyn PageDriver>,
    oracle: Arc<dyn ReasoningOracle>,
    pipeline: CapturePipeline,
    config: AgentLoopConfig,
    site_description: Option<String>,
    current_artifact: Option<ArtifactLocator>,
    tree: SectionTree,
    current_branch: Option<CollapsedElement>,
    transcript: Vec<TranscriptEntry>,
}

impl PriceScoutSession {
    pub fn new(
        url: impl Into<String>,
        driver: Arc<dyn PageDriver>,
        store: Arc<dyn ArtifactStore>,
        oracle: Arc<dyn ReasoningOracle>,
        config: AgentLoopConfig,
    ) -> Self {
        let pipeline = CapturePipeline::new(driver.clone(), store);
        Self {
            id: SessionId::new(),
            url: url.into(),
            driver,
            oracle,
            pipeline,
            config,
            site_description: None,
            current_artifact: None,
            tree: SectionTree::new(),
            current_branch: None,
            transcript: Vec::new(),
        }
    }

    /// Replace the default capture pipeline (shorter delays in tests).
    pub fn with_pipeline(mut self, pipeline: CapturePipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn tree(&self) -> &SectionTree {
        &self.tree
    }

    pub fn current_branch(&self) -> Option<&CollapsedElement> {
        self.current_branch.as_ref()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Run the loop to a terminal state.
    ///
    /// Session init, the home-page capture and the one-off site
    /// description, happens before the first iteration. Oracle and
    /// storage-sink failures propagate out and abort the run; the caller is
    /// still responsible for [`close`](Self::close) (or use
    /// [`run_to_completion`](Self::run_to_completion)).
    pub async fn run(&mut self) -> Result<SessionReport, AgentError> {
        let artifact = self.pipeline.capture(&self.url, None).await?;
        let description = self.oracle.describe_site(artifact.as_str()).await?;
        info!(session = %self.id, url = %self.url, artifact = %artifact, "session initialized");
        self.current_artifact = Some(artifact);
        self.site_description = Some(description);

        let mut steps: u32 = 0;
        loop {
            if steps >= self.config.max_steps {
                warn!(
                    max_steps = self.config.max_steps,
                    "turn bound reached before terminal action"
                );
                return Ok(self.report(SessionOutcome::MaxStepsReached, steps));
            }
            steps += 1;

            let reasoning = self
                .oracle
                .next_step(&self.config.question, &self.transcript)
                .await?;
            let thought = reasoning.thought;
            let action = reasoning.action;

            match AgentAction::parse(&action.name) {
                None => {
                    warn!(action = %action.name, "unrecognized oracle action; terminating");
                    return Ok(self.report(SessionOutcome::UnknownAction { action: action.name }, steps));
                }
                Some(AgentAction::Done) => {
                    info!(steps, result = action.input.as_deref().unwrap_or(""), "agent done");
                    return Ok(self.report(SessionOutcome::Completed { result: action.input }, steps));
                }
                Some(kind @ AgentAction::FindPrices) => {
                    let observation = self.find_prices().await?;
                    self.record(thought, kind, action.input.unwrap_or_default(), observation);
                }
                Some(kind @ AgentAction::FindCollapsedElements) => {
                    let observation = self.find_collapsed_elements().await?;
                    self.record(thought, kind, action.input.unwrap_or_default(), observation);
                }
                Some(kind @ AgentAction::ExpandCollapsedElements) => {
                    let input = action.input.unwrap_or_default();
                    let observation = self.expand_collapsed_elements(&input).await?;
                    self.record(thought, kind, input, observation);
                }
            }
        }
    }

    /// Run the loop and release the browser on every exit path.
    pub async fn run_to_completion(mut self) -> Result<SessionReport, AgentError> {
        let result = self.run().await;
        self.close().await;
        result
    }

    /// Release the session's browser resource. Must happen even on abnormal
    /// termination to avoid leaking OS-level browser processes.
    pub async fn close(&self) {
        if let Err(err) = self.driver.close().await {
            warn!(error = %err, "failed to release browser");
        }
    }

    fn record(&mut self, thought: String, action: AgentAction, input: String, observation: String) {
        self.transcript
            .push(TranscriptEntry::new(thought, action.name(), input, observation));
    }

    fn current_artifact(&self) -> Result<&str, AgentError> {
        self.current_artifact
            .as_ref()
            .map(ArtifactLocator::as_str)
            .ok_or(AgentError::Session("capture not initialized"))
    }

    fn site_description(&self) -> Result<&str, AgentError> {
        self.site_description
            .as_deref()
            .ok_or(AgentError::Session("site description not initialized"))
    }

    async fn find_prices(&self) -> Result<String, AgentError> {
        let answer = self
            .oracle
            .find_prices(self.current_artifact()?, self.site_description()?)
            .await?;
        Ok(answer)
    }

    async fn find_collapsed_elements(&mut self) -> Result<String, AgentError> {
        let node = self
            .oracle
            .identify_collapsed(
                self.current_artifact()?,
                self.site_description()?,
                self.tree.roots(),
                self.current_branch.as_ref(),
            )
            .await?;
        let observation = serde_json::to_string_pretty(&node)?;
        self.tree.upsert_root(node.clone());
        self.current_branch = Some(node);
        Ok(observation)
    }

    async fn expand_collapsed_elements(&mut self, input: &str) -> Result<String, AgentError> {
        let path = parse_expand_input(input);
        let locator = expand_path(&mut self.pipeline, &self.url, &path).await?;
        let observation = locator.to_string();
        self.current_artifact = Some(locator);
        Ok(observation)
    }

    fn report(&self, outcome: SessionOutcome, steps_taken: u32) -> SessionReport {
        SessionReport {
            outcome,
            steps_taken,
            transcript: self.transcript.clone(),
        }
    }
}
