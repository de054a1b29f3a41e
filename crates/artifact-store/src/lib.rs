//! Durable storage sink for rendered captures.
//!
//! The sink persists raster bytes and returns a retrievable locator; it is
//! assumed durable and immediately readable after return. Sink failures are
//! session-fatal; no retry is built in at this layer.

mod memory;
mod s3;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use pricescout_core_types::ArtifactLocator;

pub use memory::MemoryArtifactStore;
pub use s3::S3ArtifactStore;

/// Errors emitted by the artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact upload failed: {0}")]
    Upload(String),

    #[error("invalid artifact key: {0}")]
    InvalidKey(String),
}

/// Storage sink for rendered captures.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist `bytes` under `key` and return a locator for retrieval.
    async fn store(&self, bytes: Vec<u8>, key: &str) -> Result<ArtifactLocator, StoreError>;
}

/// Timestamped key for a fresh capture, e.g. `screenshots/1726000000000-3.png`.
/// The sequence suffix keeps captures taken within the same millisecond from
/// overwriting each other.
pub fn screenshot_key() -> String {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    format!(
        "screenshots/{}-{}.png",
        Utc::now().timestamp_millis(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    )
}
