//! Environment-driven runtime configuration.

use std::env;

use anyhow::{bail, Context, Result};

use agent_core::AgentLoopConfig;
use page_adapter::BrowserSettings;
use reasoning_oracle::OpenAiConfig;

/// Everything the binary needs to assemble a session, resolved from the
/// process environment (after `.env` loading).
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Target page to investigate.
    pub url: String,
    /// OpenAI API key.
    pub api_key: String,
    /// S3 bucket receiving the rendered captures.
    pub bucket: String,
    /// Vision-capable chat model name.
    pub model: Option<String>,
    /// Override for the OpenAI-compatible API base URL.
    pub api_base: Option<String>,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Upper bound on loop iterations.
    pub max_steps: Option<u32>,
}

impl AppConfig {
    /// Resolve from the process environment. The target URL may instead be
    /// passed as the first CLI argument, which takes precedence.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), env::args().nth(1))
    }

    fn from_lookup(
        get: impl Fn(&str) -> Option<String>,
        url_arg: Option<String>,
    ) -> Result<Self> {
        let url = match url_arg.or_else(|| get("PRICESCOUT_URL")) {
            Some(url) if !url.trim().is_empty() => url,
            _ => bail!("no target URL: pass it as the first argument or set PRICESCOUT_URL"),
        };
        let api_key = get("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY is not set")?;
        let bucket = get("PRICESCOUT_S3_BUCKET")
            .filter(|bucket| !bucket.trim().is_empty())
            .context("PRICESCOUT_S3_BUCKET is not set")?;

        let headless = match get("PRICESCOUT_HEADLESS").as_deref() {
            None | Some("") => true,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => bail!("PRICESCOUT_HEADLESS must be a boolean, got {other:?}"),
        };
        let max_steps = get("PRICESCOUT_MAX_STEPS")
            .map(|raw| {
                raw.parse::<u32>()
                    .with_context(|| format!("PRICESCOUT_MAX_STEPS is not a number: {raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            url,
            api_key,
            bucket,
            model: get("PRICESCOUT_MODEL"),
            api_base: get("PRICESCOUT_API_BASE"),
            headless,
            max_steps,
        })
    }

    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            headless: self.headless,
            ..BrowserSettings::default()
        }
    }

    pub fn oracle_config(&self) -> OpenAiConfig {
        let mut config = OpenAiConfig::new(self.api_key.clone());
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(base) = &self.api_base {
            config.api_base = base.clone();
        }
        config
    }

    pub fn loop_config(&self) -> AgentLoopConfig {
        match self.max_steps {
            Some(max) => AgentLoopConfig::default().with_max_steps(max),
            None => AgentLoopConfig::default(),
        }
    }
}
