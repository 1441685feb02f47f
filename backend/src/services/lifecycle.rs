//! Article lifecycle state machine.
//!
//! Article states carry their timestamp, so "published and archived at once"
//! cannot be expressed. Persistence stores the status enum next to the two
//! nullable dates; [`ArticleLifecycle::from_columns`] refuses any row where
//! they disagree.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::models::article::ArticleStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleLifecycle {
    Draft,
    Published { at: DateTime<Utc> },
    Archived { at: DateTime<Utc> },
}

impl ArticleLifecycle {
    pub fn from_columns(
        status: ArticleStatus,
        published_date: Option<DateTime<Utc>>,
        archived_date: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        match (status, published_date, archived_date) {
            (ArticleStatus::Draft, None, None) => Ok(Self::Draft),
            (ArticleStatus::Published, Some(at), None) => Ok(Self::Published { at }),
            (ArticleStatus::Archived, None, Some(at)) => Ok(Self::Archived { at }),
            _ => Err(AppError::Internal(format!(
                "inconsistent article state: status={} published={:?} archived={:?}",
                status, published_date, archived_date
            ))),
        }
    }

    /// Publishing is allowed from every state; re-publishing refreshes the date.
    pub fn publish(self, now: DateTime<Utc>) -> Self {
        Self::Published { at: now }
    }

    /// Archiving is allowed from every state; re-archiving refreshes the date.
    pub fn archive(self, now: DateTime<Utc>) -> Self {
        Self::Archived { at: now }
    }

    pub fn status(&self) -> ArticleStatus {
        match self {
            Self::Draft => ArticleStatus::Draft,
            Self::Published { .. } => ArticleStatus::Published,
            Self::Archived { .. } => ArticleStatus::Archived,
        }
    }

    pub fn published_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Published { at } => Some(*at),
            _ => None,
        }
    }

    pub fn archived_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Archived { at } => Some(*at),
            _ => None,
        }
    }
}

/// Result of a lifecycle transition, returned to the editor.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleChange {
    pub id: i64,
    pub status: ArticleStatus,
    pub published_date: Option<DateTime<Utc>>,
    pub archived_date: Option<DateTime<Utc>>,
}

impl LifecycleChange {
    pub fn new(id: i64, state: ArticleLifecycle) -> Self {
        Self {
            id,
            status: state.status(),
            published_date: state.published_date(),
            archived_date: state.archived_date(),
        }
    }
}
