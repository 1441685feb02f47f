//! Article models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Lifecycle state of an article.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "article_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleStatus::Draft => write!(f, "draft"),
            ArticleStatus::Published => write!(f, "published"),
            ArticleStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Full article row, as seen by the editor.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub edition_id: i64,
    pub title: String,
    pub slug: String,
    pub category_id: i64,
    pub writer_id: i64,
    #[schema(value_type = Option<Object>)]
    pub content_json: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub ads_json: Option<serde_json::Value>,
    pub cover_img: String,
    pub thumb_img: String,
    pub thumb_text: String,
    pub is_top_content: bool,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_date: Option<DateTime<Utc>>,
    pub archived_date: Option<DateTime<Utc>>,
}

/// Editable attributes of an article.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInfo {
    pub id: i64,
    pub title: String,
    pub writer_id: i64,
    pub category_id: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct ArticleContent {
    pub id: i64,
    #[schema(value_type = Option<Object>)]
    pub contents: Option<serde_json::Value>,
}

/// Published article card in reader listings.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub writer_name: String,
    pub published_date: Option<DateTime<Utc>>,
    pub thumb_img: String,
    pub thumb_text: String,
    pub edition_id: i64,
    pub edition_year: i32,
}

/// Published article page.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub writer_name: String,
    pub published_date: Option<DateTime<Utc>>,
    pub cover_img: String,
    pub category: String,
    #[schema(value_type = Option<Object>)]
    pub content_json: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub ads_json: Option<serde_json::Value>,
}

/// Row in editor article listings (drafts, per-edition).
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListItem {
    pub id: i64,
    pub title: String,
    pub writer: String,
    pub category: String,
    pub edition_id: i64,
    pub status: ArticleStatus,
    pub published_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
