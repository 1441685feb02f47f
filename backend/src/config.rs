//! Application configuration loaded from environment variables.

use crate::error::{AppError, Result};
use crate::storage::asset_path::ThumbnailConvention;
use std::env;
use std::time::Duration;

/// Which object store implementation backs the storage gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Gcs,
    Filesystem,
}

impl std::str::FromStr for StorageKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gcs" | "google-cloud" => Ok(StorageKind::Gcs),
            "filesystem" | "fs" => Ok(StorageKind::Filesystem),
            other => Err(AppError::Config(format!(
                "unknown STORAGE_BACKEND '{}', expected gcs or filesystem",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Server bind address (host:port)
    pub bind_address: String,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    pub storage_backend: StorageKind,

    /// Bucket holding article, edition, ads and announcement images
    pub gcloud_bucket: Option<String>,

    /// Base64-encoded service account JSON
    pub google_credentials_base64: Option<String>,

    /// Filesystem storage root (when storage_backend = filesystem)
    pub storage_path: String,

    /// Deadline for ordinary database and storage operations
    pub operation_timeout: Duration,

    /// Deadline for the liveness ping
    pub health_timeout: Duration,

    /// Validity window of signed upload URLs
    pub signed_url_expiry: Duration,

    pub thumbnail_convention: ThumbnailConvention,
}

redacted_debug!(Config {
    redact database_url,
    show bind_address,
    show log_level,
    show storage_backend,
    show gcloud_bucket,
    redact_option google_credentials_base64,
    show storage_path,
    show operation_timeout,
    show health_timeout,
    show signed_url_expiry,
    show thumbnail_convention,
});

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let storage_backend: StorageKind = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "gcs".into())
            .parse()?;

        let gcloud_bucket = env::var("GCLOUD_BUCKET").ok().filter(|b| !b.is_empty());
        let google_credentials_base64 = env::var("GOOGLE_CREDENTIALS_BASE64")
            .ok()
            .filter(|c| !c.is_empty());

        if storage_backend == StorageKind::Gcs {
            if gcloud_bucket.is_none() {
                return Err(AppError::Config("GCLOUD_BUCKET not set".into()));
            }
            if google_credentials_base64.is_none() {
                return Err(AppError::Config("GOOGLE_CREDENTIALS_BASE64 not set".into()));
            }
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Config("DATABASE_URL not set".into()))?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            storage_backend,
            gcloud_bucket,
            google_credentials_base64,
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| "./storage".into()),
            operation_timeout: secs_from_env("OPERATION_TIMEOUT_SECS", 10),
            health_timeout: secs_from_env("HEALTH_TIMEOUT_SECS", 15),
            signed_url_expiry: secs_from_env("SIGNED_URL_EXPIRY_SECS", 180),
            thumbnail_convention: env::var("THUMBNAIL_CONVENTION")
                .unwrap_or_else(|_| "prefixed-jpg".into())
                .parse()?,
        })
    }

    /// Configuration for tests and local tooling: filesystem storage, default deadlines.
    pub fn for_filesystem(database_url: impl Into<String>, storage_path: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            bind_address: "127.0.0.1:0".into(),
            log_level: "debug".into(),
            storage_backend: StorageKind::Filesystem,
            gcloud_bucket: None,
            google_credentials_base64: None,
            storage_path: storage_path.into(),
            operation_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(15),
            signed_url_expiry: Duration::from_secs(180),
            thumbnail_convention: ThumbnailConvention::PrefixedJpg,
        }
    }
}

fn secs_from_env(name: &str, default: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}
