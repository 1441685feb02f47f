//! Business logic services.

pub mod announcement_service;
pub mod article_service;
pub mod asset_service;
pub mod category_service;
pub mod edition_service;
pub mod lifecycle;

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Run `fut` under a deadline; elapsed deadlines surface as `AppError::Timeout`
/// rather than whatever error the interrupted call would have produced.
pub async fn bounded<T, F>(deadline: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(deadline_ms = deadline.as_millis() as u64, "Operation timed out");
            Err(AppError::Timeout)
        }
    }
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}
