//! Port abstraction for the object store holding uploaded hotel images.
use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::AssetKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object store adapters.
    pub enum AssetStoreError {
        /// The store could not be reached.
        Unavailable { message: String } => "object store is unavailable: {message}",
        /// The store refused the write.
        Rejected { message: String } => "object store rejected the upload: {message}",
    }
}

/// Location of an object after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    /// Bucket or namespace that holds the object.
    pub container: String,
    /// Key the object was written under.
    pub key: AssetKey,
    /// Opaque version tag reported by the store, when it has one.
    pub version: Option<String>,
}

/// Durable storage of binary payloads keyed by file name.
///
/// Writing to an existing key replaces the stored object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `data` under `key`.
    async fn put(&self, key: &AssetKey, data: Bytes) -> Result<AssetReference, AssetStoreError>;
}
