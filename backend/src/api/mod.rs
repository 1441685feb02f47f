//! API module - HTTP handlers, middleware and the response envelope.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;

use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::announcement_service::AnnouncementService;
use crate::services::article_service::ArticleService;
use crate::services::asset_service::AssetService;
use crate::services::category_service::CategoryService;
use crate::services::edition_service::EditionService;
use crate::storage::ObjectStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: PgPool,
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(config: Config, db: PgPool, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, db, store }
    }

    /// Run `fut` under the per-request operation deadline.
    pub async fn bounded<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        crate::services::bounded(self.config.operation_timeout, fut).await
    }

    pub fn article_service(&self) -> ArticleService {
        ArticleService::new(self.db.clone())
    }

    pub fn edition_service(&self) -> EditionService {
        EditionService::new(self.db.clone())
    }

    pub fn category_service(&self) -> CategoryService {
        CategoryService::new(self.db.clone())
    }

    pub fn asset_service(&self) -> AssetService {
        AssetService::new(
            self.db.clone(),
            self.store.clone(),
            self.config.thumbnail_convention,
            self.config.signed_url_expiry,
        )
    }

    pub fn announcement_service(&self) -> AnnouncementService {
        AnnouncementService::new(
            self.db.clone(),
            self.store.clone(),
            self.config.signed_url_expiry,
        )
    }
}

pub type SharedState = Arc<AppState>;
