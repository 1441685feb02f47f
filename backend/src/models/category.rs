//! Category and writer models.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Category id shared by every edition for articles not yet filed.
pub const UNCATEGORIZED_ID: i64 = 1;

/// Writer id assigned to new articles.
pub const UNKNOWN_WRITER_ID: i64 = 1;

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub edition_id: Option<i64>,
    pub label: String,
    pub key: String,
    pub sort_order: i32,
}

/// Category entry in an edition's table of contents.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct CategoryItem {
    pub id: i64,
    pub label: String,
    pub order: i32,
}

/// Category choice offered to the editor.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct CategoryOption {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Writer {
    pub id: i64,
    pub writer_name: String,
}
