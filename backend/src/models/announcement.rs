//! Parish announcement ("berita") model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub section: String,
    pub thumb_img: String,
    pub descriptions: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
    pub publish_start: Option<DateTime<Utc>>,
    pub publish_end: Option<DateTime<Utc>>,
}

/// Reader-facing listing entry.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementSummary {
    pub id: i64,
    pub title: String,
    pub section: String,
    pub thumb_img: String,
    pub descriptions: String,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDetail {
    pub id: i64,
    pub title: String,
    pub section: String,
    pub thumb_img: String,
    pub descriptions: String,
    pub details: String,
}
