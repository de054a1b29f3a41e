use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent_core::{PriceScoutSession, SessionOutcome};
use artifact_store::S3ArtifactStore;
use page_adapter::ChromiumPageDriver;
use pricescout_cli::AppConfig;
use reasoning_oracle::OpenAiOracle;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(url = %config.url, headless = config.headless, "starting pricescout");

    let store = Arc::new(S3ArtifactStore::from_env(config.bucket.clone()).await);
    let oracle = Arc::new(OpenAiOracle::new(config.oracle_config())?);
    let driver = Arc::new(
        ChromiumPageDriver::launch(&config.browser_settings())
            .await
            .context("failed to launch browser")?,
    );

    let session = PriceScoutSession::new(
        config.url.clone(),
        driver,
        store,
        oracle,
        config.loop_config(),
    );
    let report = session.run_to_completion().await?;

    match &report.outcome {
        SessionOutcome::Completed { result } => {
            println!("{}", result.as_deref().unwrap_or("(no final answer)"));
        }
        SessionOutcome::UnknownAction { action } => {
            println!("stopped on unrecognized action {action:?}");
        }
        SessionOutcome::MaxStepsReached => {
            println!(
                "stopped after {} steps without a final answer",
                report.steps_taken
            );
        }
    }
    info!(
        steps = report.steps_taken,
        entries = report.transcript.len(),
        "session finished"
    );
    Ok(())
}
