//! S3-backed artifact store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use pricescout_core_types::ArtifactLocator;

use crate::{ArtifactStore, StoreError};

/// Persists captures to an S3 bucket and hands back the public object URL.
#[derive(Clone)]
pub struct S3ArtifactStore {
    client: Client,
    bucket: String,
}

impl S3ArtifactStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a store from the ambient AWS environment (credentials chain,
    /// region).
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn store(&self, bytes: Vec<u8>, key: &str) -> Result<ArtifactLocator, StoreError> {
        if key.is_empty() || key.starts_with('/') {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("image/png")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| StoreError::Upload(err.to_string()))?;

        debug!(bucket = %self.bucket, key, size, "capture uploaded");

        Ok(ArtifactLocator(format!(
            "https://{}.s3.amazonaws.com/{}",
            self.bucket, key
        )))
    }
}
