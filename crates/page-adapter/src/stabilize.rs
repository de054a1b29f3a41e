//! Render stabilization: deciding when a script-driven page has stopped
//! mutating and is safe to sample.

use std::time::Duration;

use tracing::{debug, info};

use crate::driver::PageDriver;

/// Watches the serialized-document size until it stops changing.
///
/// Stabilization is best-effort and never fails the caller: if the size
/// signal never settles, the stabilizer simply returns once the budget is
/// spent and the capture proceeds with whatever state exists.
#[derive(Debug, Clone)]
pub struct RenderStabilizer {
    timeout: Duration,
    check_interval: Duration,
    min_stable_samples: u32,
}

impl Default for RenderStabilizer {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            check_interval: Duration::from_secs(1),
            min_stable_samples: 3,
        }
    }
}

impl RenderStabilizer {
    pub fn new(timeout: Duration, check_interval: Duration, min_stable_samples: u32) -> Self {
        Self {
            timeout,
            check_interval,
            min_stable_samples,
        }
    }

    /// Sample the page once per interval until the document size has been
    /// unchanged and nonzero for `min_stable_samples` consecutive samples,
    /// or the timeout budget elapses, whichever comes first.
    pub async fn wait_until_settled(&self, driver: &dyn PageDriver) {
        let max_checks =
            (self.timeout.as_millis() / self.check_interval.as_millis().max(1)).max(1) as u32;
        let mut last_size: usize = 0;
        let mut stable_samples: u32 = 0;

        for check in 1..=max_checks {
            let current_size = match driver.content().await {
                Ok(html) => html.len(),
                Err(err) => {
                    debug!(check, error = %err, "content read failed during stabilization");
                    0
                }
            };
            let body_size = driver.body_content_length().await.unwrap_or(0);

            debug!(check, last_size, current_size, body_size, "render sample");

            if last_size != 0 && current_size == last_size {
                stable_samples += 1;
            } else {
                stable_samples = 0;
            }

            if stable_samples >= self.min_stable_samples {
                info!(checks = check, size = current_size, "page render settled");
                return;
            }

            last_size = current_size;
            tokio::time::sleep(self.check_interval).await;
        }

        info!(
            budget_secs = self.timeout.as_secs(),
            "render never settled within budget; proceeding with current state"
        );
    }
}
