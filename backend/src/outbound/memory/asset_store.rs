//! Object store held in a map.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::lock;
use crate::domain::AssetKey;
use crate::domain::ports::{AssetReference, AssetStore, AssetStoreError};

/// [`AssetStore`] keeping objects in memory; later writes replace earlier ones.
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    container: String,
    objects: Mutex<HashMap<AssetKey, Bytes>>,
    next_failure: Mutex<Option<AssetStoreError>>,
    puts: Mutex<usize>,
}

impl InMemoryAssetStore {
    /// Create an empty store named `container`.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Self::default()
        }
    }

    /// Make the next `put` fail with `error`.
    pub fn fail_next(&self, error: AssetStoreError) {
        *lock(&self.next_failure) = Some(error);
    }

    /// Contents stored under `key`.
    pub fn object(&self, key: &str) -> Option<Bytes> {
        lock(&self.objects)
            .iter()
            .find(|(stored, _)| stored.as_ref() == key)
            .map(|(_, data)| data.clone())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `put` calls received, failed ones included.
    pub fn put_count(&self) -> usize {
        *lock(&self.puts)
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn put(&self, key: &AssetKey, data: Bytes) -> Result<AssetReference, AssetStoreError> {
        *lock(&self.puts) += 1;
        if let Some(error) = lock(&self.next_failure).take() {
            return Err(error);
        }
        debug!(asset_key = %key, bytes = data.len(), "storing object in memory");
        lock(&self.objects).insert(key.clone(), data);
        Ok(AssetReference {
            container: self.container.clone(),
            key: key.clone(),
            version: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn later_writes_replace_earlier_ones() {
        let store = InMemoryAssetStore::new("images");
        let key = AssetKey::new("lobby.jpg").expect("key");

        store.put(&key, Bytes::from_static(b"old")).await.expect("first put");
        let reference = store.put(&key, Bytes::from_static(b"new")).await.expect("second put");

        assert_eq!(reference.container, "images");
        assert_eq!(store.len(), 1);
        assert_eq!(store.object("lobby.jpg"), Some(Bytes::from_static(b"new")));
    }

    #[rstest]
    #[tokio::test]
    async fn injected_failure_applies_once() {
        let store = InMemoryAssetStore::new("images");
        let key = AssetKey::new("pool.jpg").expect("key");
        store.fail_next(AssetStoreError::unavailable("maintenance"));

        assert!(store.put(&key, Bytes::new()).await.is_err());
        assert!(store.put(&key, Bytes::new()).await.is_ok());
        assert_eq!(store.put_count(), 2);
    }
}
