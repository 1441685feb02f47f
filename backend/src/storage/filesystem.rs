//! Filesystem object store, for local development and tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use super::{content_type_for_key, ObjectAttrs, ObjectStore, StoredObject};
use crate::error::{AppError, Result};

/// Object store rooted at a local directory; keys map to relative paths.
pub struct FilesystemStore {
    base_path: PathBuf,
}

impl FilesystemStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Resolve a key, refusing absolute paths and `..` segments.
    fn key_to_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            return Err(AppError::Storage(format!("invalid object key '{}'", key)));
        }
        Ok(self.base_path.join(relative))
    }

    /// Store bytes at `key`, creating parent directories.
    pub async fn put(&self, key: &str, content: Bytes) -> Result<()> {
        let path = self.key_to_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &content).await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FilesystemStore {
    async fn move_object(&self, old: &str, new: &str) -> Result<ObjectAttrs> {
        let from = self.key_to_path(old)?;
        let to = self.key_to_path(new)?;

        if fs::try_exists(&to).await? {
            return Err(AppError::Storage(format!(
                "failed to move {} to {}: destination already exists",
                old, new
            )));
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&from, &to).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::ObjectNotFound(old.to_string()),
            _ => AppError::Storage(format!("failed to move {} to {}: {}", old, new, e)),
        })?;

        let meta = fs::metadata(&to)
            .await
            .map_err(|e| AppError::Storage(format!("failed to stat {}: {}", new, e)))?;
        let updated: DateTime<Utc> = meta.modified().map(Into::into).unwrap_or_else(|_| Utc::now());

        Ok(ObjectAttrs {
            name: new.to_string(),
            content_type: Some(content_type_for_key(new).to_string()),
            size: meta.len(),
            updated,
        })
    }

    async fn signed_upload_url(
        &self,
        key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> Result<String> {
        Err(AppError::Storage(format!(
            "signed uploads are not supported by filesystem storage (key '{}')",
            key
        )))
    }

    async fn read(&self, key: &str) -> Result<StoredObject> {
        let path = self.key_to_path(key)?;
        let data = fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::ObjectNotFound(key.to_string()),
            _ => AppError::ReadFailure(format!("failed to read {}: {}", key, e)),
        })?;
        Ok(StoredObject {
            data: Bytes::from(data),
            content_type: content_type_for_key(key).to_string(),
        })
    }

    async fn health(&self) -> Result<()> {
        let meta = fs::metadata(&self.base_path).await.map_err(|e| {
            AppError::Storage(format!(
                "storage root {} unavailable: {}",
                self.base_path.display(),
                e
            ))
        })?;
        if !meta.is_dir() {
            return Err(AppError::Storage(format!(
                "storage root {} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }
}
