//! End-to-end loop scenarios with a scripted oracle, a stub page driver and
//! the in-memory artifact store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use agent_core::{AgentError, AgentLoopConfig, PriceScoutSession, SessionOutcome};
use artifact_store::MemoryArtifactStore;
use page_adapter::{ClipRegion, PageDriver, PageError};
use pricescout_core_types::CollapsedElement;
use reasoning_oracle::{MockOracle, Reasoning};

#[derive(Default)]
struct StubDriver {
    scripts: Mutex<Vec<String>>,
}

#[async_trait]
impl PageDriver for StubDriver {
    async fn navigate(&self, _url: &str, _timeout: Duration) -> Result<(), PageError> {
        Ok(())
    }

    async fn content(&self) -> Result<String, PageError> {
        Ok("<html><body>veterinary clinic</body></html>".to_string())
    }

    async fn body_content_length(&self) -> Result<u64, PageError> {
        Ok(17)
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, PageError> {
        self.scripts.lock().push(expression.to_string());
        Ok(Value::Bool(true))
    }

    async fn screenshot(&self, _clip: ClipRegion) -> Result<Vec<u8>, PageError> {
        Ok(vec![137, 80, 78, 71])
    }

    async fn close(&self) -> Result<(), PageError> {
        Ok(())
    }
}

struct Harness {
    driver: Arc<StubDriver>,
    store: Arc<MemoryArtifactStore>,
    oracle: Arc<MockOracle>,
}

impl Harness {
    fn new() -> Self {
        let oracle = Arc::new(MockOracle::new());
        oracle.push_description("A small-animal veterinary clinic site.");
        Self {
            driver: Arc::new(StubDriver::default()),
            store: Arc::new(MemoryArtifactStore::new()),
            oracle,
        }
    }

    fn session(&self, config: AgentLoopConfig) -> PriceScoutSession {
        PriceScoutSession::new(
            "https://clinic.example",
            self.driver.clone(),
            self.store.clone(),
            self.oracle.clone(),
            config,
        )
    }
}

fn step(thought: &str, action: &str, input: Option<&str>) -> Reasoning {
    Reasoning::new(thought, action, input.map(str::to_string))
}

#[tokio::test(start_paused = true)]
async fn done_on_first_turn_ends_with_empty_transcript() {
    let harness = Harness::new();
    harness
        .oracle
        .push_step(step("nothing left to check", "done", Some("No prices found")));

    let mut session = harness.session(AgentLoopConfig::default());
    let report = session.run().await.unwrap();

    assert_eq!(
        report.outcome,
        SessionOutcome::Completed {
            result: Some("No prices found".to_string())
        }
    );
    assert_eq!(report.steps_taken, 1);
    assert!(report.transcript.is_empty());
    // Only the initial capture went to the sink.
    assert_eq!(harness.store.len(), 1);
    assert_eq!(harness.oracle.seen_transcript_lens(), vec![0]);
}

#[tokio::test(start_paused = true)]
async fn find_prices_appends_one_transcript_entry() {
    let harness = Harness::new();
    harness
        .oracle
        .push_step(step("read the visible pricing", "find_prices", None));
    harness
        .oracle
        .push_step(step("that answers it", "done", Some("Vaccination $45")));
    harness
        .oracle
        .push_price_answer("Vaccination $45, checkup $60, dental cleaning $120");

    let mut session = harness.session(AgentLoopConfig::default());
    let report = session.run().await.unwrap();

    assert!(report.is_completed());
    assert_eq!(report.steps_taken, 2);
    assert_eq!(report.transcript.len(), 1);
    let entry = &report.transcript[0];
    assert_eq!(entry.thought, "read the visible pricing");
    assert_eq!(entry.action, "find_prices");
    assert_eq!(entry.input, "");
    assert_eq!(
        entry.observation,
        "Vaccination $45, checkup $60, dental cleaning $120"
    );
    // Second turn saw the entry appended by the first.
    assert_eq!(harness.oracle.seen_transcript_lens(), vec![0, 1]);
}

#[tokio::test(start_paused = true)]
async fn expansion_recaptures_and_updates_the_current_artifact() {
    let harness = Harness::new();
    let chain = CollapsedElement::new("Services", vec![CollapsedElement::leaf("Lab tests")]);
    let chain_json = serde_json::to_string(&chain).unwrap();

    harness
        .oracle
        .push_step(step("look for folded sections", "find_collapsed_elements", None));
    harness.oracle.push_step(step(
        "open the services accordion",
        "expand_collapsed_elements",
        Some(&chain_json),
    ));
    harness
        .oracle
        .push_step(step("now read prices", "find_prices", None));
    harness
        .oracle
        .push_step(step("enough", "done", Some("Lab tests $80")));
    harness.oracle.push_collapsed(chain.clone());
    harness.oracle.push_price_answer("Lab tests $80");

    let mut session = harness.session(AgentLoopConfig::default());
    let report = session.run().await.unwrap();

    assert!(report.is_completed());
    assert_eq!(report.transcript.len(), 3);

    // Discovery merged the chain into the tree and set the working branch.
    assert_eq!(session.tree().roots().len(), 1);
    assert_eq!(session.tree().roots()[0].label, "Services");
    assert_eq!(
        session.current_branch().unwrap().chain_path(),
        "Services -> Lab tests."
    );

    // Expansion evaluated the click script and persisted a second capture.
    let scripts = harness.driver.scripts.lock().clone();
    assert!(scripts.iter().any(|s| s.contains("Lab tests")));
    assert_eq!(harness.store.len(), 2);

    // The expansion observation is the fresh locator, and the later
    // find_prices call was shown that capture rather than the first one.
    let expand_entry = &report.transcript[1];
    assert!(expand_entry.observation.starts_with("memory://screenshots/"));
    let images = harness.oracle.seen_images();
    assert_eq!(images.len(), 2);
    assert_eq!(&images[1], &expand_entry.observation);
    assert_ne!(images[0], images[1]);
}

#[tokio::test(start_paused = true)]
async fn rediscovered_root_replaces_the_previous_chain() {
    let harness = Harness::new();
    harness
        .oracle
        .push_step(step("scan for sections", "find_collapsed_elements", None));
    harness
        .oracle
        .push_step(step("scan again, deeper", "find_collapsed_elements", None));
    harness.oracle.push_step(step("stop", "done", None));
    harness
        .oracle
        .push_collapsed(CollapsedElement::leaf("Services"));
    harness.oracle.push_collapsed(CollapsedElement::new(
        "Services",
        vec![CollapsedElement::leaf("Surgery")],
    ));

    let mut session = harness.session(AgentLoopConfig::default());
    let report = session.run().await.unwrap();

    assert!(report.is_completed());
    // Same label, so the deeper chain replaced the earlier root in place.
    assert_eq!(session.tree().roots().len(), 1);
    assert_eq!(session.tree().roots()[0].deepest().label, "Surgery");
    // The first discovery ran with no working branch; the second saw the
    // chain recorded by the first.
    assert_eq!(
        harness.oracle.seen_branches(),
        vec![None, Some("Services.".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_action_terminates_without_running_handlers() {
    let harness = Harness::new();
    harness
        .oracle
        .push_step(step("try scrolling", "scroll_page", None));

    let mut session = harness.session(AgentLoopConfig::default());
    let report = session.run().await.unwrap();

    assert_eq!(
        report.outcome,
        SessionOutcome::UnknownAction {
            action: "scroll_page".to_string()
        }
    );
    assert!(report.transcript.is_empty());
    // Nothing beyond the initial capture happened.
    assert_eq!(harness.store.len(), 1);
    assert_eq!(harness.oracle.seen_images().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn turn_bound_stops_a_looping_oracle() {
    let harness = Harness::new();
    for _ in 0..2 {
        harness
            .oracle
            .push_step(step("check prices once more", "find_prices", None));
        harness.oracle.push_price_answer("No prices visible yet");
    }

    let mut session = harness.session(AgentLoopConfig::default().with_max_steps(2));
    let report = session.run().await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::MaxStepsReached);
    assert_eq!(report.steps_taken, 2);
    assert_eq!(report.transcript.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn oracle_failure_aborts_the_session() {
    let harness = Harness::new();
    // No steps scripted: the first next_step call fails.

    let mut session = harness.session(AgentLoopConfig::default());
    let err = session.run().await.unwrap_err();
    assert!(matches!(err, AgentError::Oracle(_)));
    session.close().await;
}
