//! Storage gateway: the object store holding every magazine image.

pub mod asset_path;
pub mod filesystem;
pub mod gcs;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, StorageKind};
use crate::error::{AppError, Result};

/// Metadata reported by the store after a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttrs {
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub updated: DateTime<Utc>,
}

/// Object body plus its stored content type.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Object store trait
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Rename `old` to `new`; `old` no longer exists afterwards.
    async fn move_object(&self, old: &str, new: &str) -> Result<ObjectAttrs>;

    /// Time-limited URL allowing a client to PUT exactly `content_type` at `key`.
    async fn signed_upload_url(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String>;

    /// Fetch an object. Missing keys fail with `ObjectNotFound`.
    async fn read(&self, key: &str) -> Result<StoredObject>;

    /// Reachability check used by `/health`.
    async fn health(&self) -> Result<()>;
}

/// Build the store selected by configuration.
pub async fn build_store(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    match config.storage_backend {
        StorageKind::Gcs => {
            let bucket = config
                .gcloud_bucket
                .clone()
                .ok_or_else(|| AppError::Config("GCLOUD_BUCKET not set".into()))?;
            let credentials = config
                .google_credentials_base64
                .as_deref()
                .ok_or_else(|| AppError::Config("GOOGLE_CREDENTIALS_BASE64 not set".into()))?;
            let store = gcs::GcsStore::new(gcs::GcsConfig::from_base64(bucket, credentials)?)?;
            tracing::info!(bucket = %store.bucket(), "Using Google Cloud Storage");
            Ok(Arc::new(store))
        }
        StorageKind::Filesystem => {
            let store = filesystem::FilesystemStore::new(&config.storage_path);
            store.ensure_root().await?;
            tracing::info!(path = %config.storage_path, "Using filesystem storage");
            Ok(Arc::new(store))
        }
    }
}

/// Guess an image content type from a key's extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("a/b/cover.PNG"), "image/png");
        assert_eq!(content_type_for_key("thumb_x.jpg"), "image/jpeg");
        assert_eq!(content_type_for_key("x_thumb.webp"), "image/webp");
        assert_eq!(content_type_for_key("README"), "application/octet-stream");
    }
}
