//! Capture pipeline: navigation, settle wait, rasterization and handoff to
//! the storage sink.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use artifact_store::{screenshot_key, ArtifactStore};
use page_adapter::{ClipRegion, PageDriver, RenderStabilizer};
use pricescout_core_types::ArtifactLocator;

use crate::errors::AgentError;

/// Orchestrates one capture: on the first call it navigates and waits for
/// the render to settle; on every call it optionally runs a DOM mutation
/// script, waits a fixed settle delay for expand animations, rasterizes the
/// fixed above-the-fold crop and persists it.
///
/// Raw raster bytes are not retained after the sink handoff; only the
/// returned locator survives.
pub struct CapturePipeline {
    driver: Arc<dyn PageDriver>,
    store: Arc<dyn ArtifactStore>,
    stabilizer: RenderStabilizer,
    navigation_timeout: Duration,
    settle_delay: Duration,
    navigated: bool,
}

impl CapturePipeline {
    pub fn new(driver: Arc<dyn PageDriver>, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            driver,
            store,
            stabilizer: RenderStabilizer::default(),
            navigation_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_secs(3),
            navigated: false,
        }
    }

    pub fn with_stabilizer(mut self, stabilizer: RenderStabilizer) -> Self {
        self.stabilizer = stabilizer;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Capture the page, optionally mutating the DOM first.
    ///
    /// Navigation happens once per session; a navigation failure is logged
    /// and swallowed so the capture proceeds on whatever state exists; a
    /// blank or partial page is an accepted degraded result, not an error.
    /// Mutation-script failures are likewise degraded-continue. Storage-sink
    /// failures propagate as fatal.
    pub async fn capture(
        &mut self,
        url: &str,
        mutate_js: Option<&str>,
    ) -> Result<ArtifactLocator, AgentError> {
        if !self.navigated {
            if let Err(err) = self.driver.navigate(url, self.navigation_timeout).await {
                warn!(%url, error = %err, "navigation failed; capturing current page state");
            }
            self.stabilizer.wait_until_settled(self.driver.as_ref()).await;
            self.navigated = true;
        }

        if let Some(script) = mutate_js {
            if let Err(err) = self.driver.evaluate(script).await {
                warn!(error = %err, "mutation script failed; capturing unmodified state");
            }
        }

        // Let CSS/JS-driven expand animations finish before sampling.
        tokio::time::sleep(self.settle_delay).await;

        let bytes = self.driver.screenshot(ClipRegion::above_the_fold()).await?;
        let key = screenshot_key();
        let locator = self.store.store(bytes, &key).await?;
        debug!(%locator, "rendered capture stored");
        Ok(locator)
    }
}
