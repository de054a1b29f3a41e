//! In-memory artifact store used by tests and offline development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use pricescout_core_types::ArtifactLocator;

use crate::{ArtifactStore, StoreError};

/// Keeps captures in a map and returns `memory://` locators.
#[derive(Default)]
pub struct MemoryArtifactStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: bool,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every upload fails, for exercising sink-fatal paths.
    pub fn failing() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_uploads: true,
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store(&self, bytes: Vec<u8>, key: &str) -> Result<ArtifactLocator, StoreError> {
        if self.fail_uploads {
            return Err(StoreError::Upload("memory store configured to fail".into()));
        }
        self.objects.lock().insert(key.to_string(), bytes);
        Ok(ArtifactLocator(format!("memory://{key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_returns_memory_locator() {
        let store = MemoryArtifactStore::new();
        let locator = store.store(vec![1, 2, 3], "screenshots/1.png").await.unwrap();
        assert_eq!(locator.as_str(), "memory://screenshots/1.png");
        assert_eq!(store.get("screenshots/1.png"), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn failing_store_propagates_upload_error() {
        let store = MemoryArtifactStore::failing();
        let err = store.store(vec![0], "screenshots/1.png").await.unwrap_err();
        assert!(matches!(err, StoreError::Upload(_)));
        assert!(store.is_empty());
    }
}
