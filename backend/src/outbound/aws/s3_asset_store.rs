//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use crate::domain::AssetKey;
use crate::domain::ports::{AssetReference, AssetStore, AssetStoreError};

/// [`AssetStore`] writing objects to one S3 bucket.
#[derive(Debug, Clone)]
pub struct S3AssetStore {
    client: Client,
    bucket: String,
}

impl S3AssetStore {
    /// Create a store for `bucket`.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> AssetStoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            AssetStoreError::unavailable(message)
        }
        _ => AssetStoreError::rejected(message),
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn put(&self, key: &AssetKey, data: Bytes) -> Result<AssetReference, AssetStoreError> {
        debug!(bucket = %self.bucket, asset_key = %key, bytes = data.len(), "PutObject");
        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_ref())
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(AssetReference {
            container: self.bucket.clone(),
            key: key.clone(),
            version: output.version_id().map(str::to_owned),
        })
    }
}
