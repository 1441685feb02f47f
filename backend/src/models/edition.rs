//! Edition models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::category::CategoryItem;

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    pub id: i64,
    pub title: String,
    pub edition_year: i32,
    pub cover_img: String,
    pub thumb_img: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Admin edition list with the currently active edition.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditionList {
    pub editions: Vec<Edition>,
    pub active_edition: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditionInfo {
    pub id: i64,
    pub title: String,
    pub edition_year: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Reader view of an edition and its table of contents.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditionDetail {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub cover_img: String,
    pub categories: Vec<CategoryItem>,
}

/// Current cover pointers of an article or edition.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverPaths {
    pub id: i64,
    pub cover_img: String,
    pub thumbnail_img: String,
}
