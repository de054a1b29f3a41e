//! Page driver trait and its chromiumoxide implementation.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport};
use chromiumoxide::handler::viewport::Viewport as EmulatedViewport;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::PageError;
use crate::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Launch-time browser settings.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub device_scale_factor: f64,
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            device_scale_factor: 1.0,
            chrome_executable: None,
        }
    }
}

/// Rasterized region, measured from the page origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ClipRegion {
    /// The fixed capture crop: viewport width by 1.25x viewport height from
    /// the origin, regardless of actual content height.
    pub fn above_the_fold() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: f64::from(VIEWPORT_WIDTH),
            height: f64::from(VIEWPORT_HEIGHT) * 1.25,
        }
    }
}

/// Narrow contract over the live page, the session's single shared mutable
/// resource. No locking is needed: the agent loop enforces strict turn
/// ordering, so access is always sequential.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate the session page, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), PageError>;

    /// Full serialized document markup.
    async fn content(&self) -> Result<String, PageError>;

    /// Length of `document.body.innerHTML`, the second render-size signal.
    async fn body_content_length(&self) -> Result<u64, PageError>;

    /// Run arbitrary DOM logic against the live page.
    async fn evaluate(&self, expression: &str) -> Result<Value, PageError>;

    /// Rasterize a fixed region of the page as PNG bytes.
    async fn screenshot(&self, clip: ClipRegion) -> Result<Vec<u8>, PageError>;

    /// Release the underlying browser process. Idempotent.
    async fn close(&self) -> Result<(), PageError>;
}

/// Chromium-backed driver: one browser, one page, reused for the whole
/// session lifetime.
pub struct ChromiumPageDriver {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumPageDriver {
    /// Launch a browser with the fixed session viewport and open the page
    /// that every subsequent capture reuses.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, PageError> {
        let mut builder = BrowserConfig::builder().viewport(EmulatedViewport {
            width: settings.viewport_width,
            height: settings.viewport_height,
            device_scale_factor: Some(settings.device_scale_factor),
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        });

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        let config = builder.build().map_err(PageError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| PageError::Launch(err.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| PageError::Launch(format!("failed to open page: {err}")))?;

        info!(
            headless = settings.headless,
            viewport_width = settings.viewport_width,
            viewport_height = settings.viewport_height,
            "browser launched"
        );

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler_task,
        })
    }
}

#[async_trait]
impl PageDriver for ChromiumPageDriver {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), PageError> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|err| PageError::Navigation(err.to_string()))?;
            // Best-effort wait for the load lifecycle; script-driven pages
            // settle later via the render stabilizer.
            let _ = self.page.wait_for_navigation().await;
            Ok(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(PageError::Navigation(format!(
                "timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    async fn content(&self) -> Result<String, PageError> {
        self.page
            .content()
            .await
            .map_err(|err| PageError::Content(err.to_string()))
    }

    async fn body_content_length(&self) -> Result<u64, PageError> {
        let value = self
            .evaluate("document.body ? document.body.innerHTML.length : 0")
            .await?;
        Ok(value.as_u64().unwrap_or(0))
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, PageError> {
        let result = self
            .page
            .evaluate(expression)
            .await
            .map_err(|err| PageError::Evaluation(err.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn screenshot(&self, clip: ClipRegion) -> Result<Vec<u8>, PageError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .omit_background(true)
            .clip(Viewport {
                x: clip.x,
                y: clip.y,
                width: clip.width,
                height: clip.height,
                scale: 1.0,
            })
            .build();

        self.page
            .screenshot(params)
            .await
            .map_err(|err| PageError::Screenshot(err.to_string()))
    }

    async fn close(&self) -> Result<(), PageError> {
        let mut guard = self.browser.lock().await;
        let Some(mut browser) = guard.take() else {
            return Ok(());
        };
        if let Err(err) = browser.close().await {
            warn!(error = %err, "browser close reported an error");
        }
        let _ = browser.wait().await;
        self.handler_task.abort();
        info!("browser released");
        Ok(())
    }
}
