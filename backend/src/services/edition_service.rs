//! Edition service: creation, publishing and the active-edition marker.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::models::category::CategoryItem;
use crate::models::edition::{Edition, EditionDetail, EditionInfo, EditionList};
use crate::storage::asset_path::PLACEHOLDER_IMAGE;
use crate::validation::{require_non_empty, validate_edition_year};

fn edition_not_found() -> AppError {
    AppError::not_found("edition not found")
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditionPublished {
    pub id: i64,
    pub published_at: DateTime<Utc>,
}

pub struct EditionService {
    db: PgPool,
}

impl EditionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, title: &str, year: i32) -> Result<i64> {
        require_non_empty("title", title)?;
        validate_edition_year(year)?;

        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO editions (title, edition_year, cover_img, thumb_img, created_at, updated_at)
            VALUES ($1, $2, $3, $3, $4, $4)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(year)
        .bind(PLACEHOLDER_IMAGE)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(edition_id = id, year, "Created edition");
        Ok(id)
    }

    pub async fn save_info(&self, id: i64, title: &str, year: i32) -> Result<()> {
        require_non_empty("title", title)?;
        validate_edition_year(year)?;
        self.ensure_exists(id).await?;

        let result = sqlx::query(
            "UPDATE editions SET title = $2, edition_year = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(title)
        .bind(year)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(edition_not_found());
        }
        Ok(())
    }

    /// Make `id` the active edition and stamp its publication time.
    ///
    /// Marker and `published_at` change in one transaction, so readers never
    /// see an active edition that is unpublished.
    pub async fn publish(&self, id: i64) -> Result<EditionPublished> {
        let mut tx = self.db.begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM editions WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Err(edition_not_found());
        }

        // Re-publishing an edition refreshes its timestamp.
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO active_edition (singleton, edition_id, updated_at)
            VALUES (TRUE, $1, $2)
            ON CONFLICT (singleton)
            DO UPDATE SET edition_id = EXCLUDED.edition_id, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE editions SET published_at = $2, updated_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(edition_not_found());
        }

        tx.commit().await?;

        tracing::info!(edition_id = id, "Published edition and set it active");
        Ok(EditionPublished {
            id,
            published_at: now,
        })
    }

    pub async fn ensure_exists(&self, id: i64) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM editions WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        if !exists {
            return Err(edition_not_found());
        }
        Ok(())
    }

    pub async fn active_edition_id(&self) -> Result<Option<i64>> {
        let id = sqlx::query_scalar("SELECT edition_id FROM active_edition")
            .fetch_optional(&self.db)
            .await?;
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Editor reads
    // -----------------------------------------------------------------------

    pub async fn list_all(&self) -> Result<EditionList> {
        let editions = sqlx::query_as::<_, Edition>(
            "SELECT * FROM editions ORDER BY edition_year DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await?;
        let active_edition = self.active_edition_id().await?;
        Ok(EditionList {
            editions,
            active_edition,
        })
    }

    pub async fn info(&self, id: i64) -> Result<EditionInfo> {
        sqlx::query_as::<_, EditionInfo>(
            r#"
            SELECT e.id, e.title, e.edition_year, e.published_at,
                   (ae.edition_id IS NOT NULL) AS is_active
            FROM editions e
            LEFT JOIN active_edition ae ON ae.edition_id = e.id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(edition_not_found)
    }

    // -----------------------------------------------------------------------
    // Reader reads
    // -----------------------------------------------------------------------

    pub async fn list_published(&self) -> Result<Vec<Edition>> {
        let editions = sqlx::query_as::<_, Edition>(
            "SELECT * FROM editions WHERE published_at IS NOT NULL ORDER BY published_at DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(editions)
    }

    pub async fn active(&self) -> Result<Edition> {
        sqlx::query_as::<_, Edition>(
            r#"
            SELECT e.* FROM editions e
            JOIN active_edition ae ON ae.edition_id = e.id
            "#,
        )
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("no active edition"))
    }

    /// Published edition with its categories in display order.
    pub async fn published_detail(&self, id: i64) -> Result<EditionDetail> {
        let edition = sqlx::query_as::<_, Edition>(
            "SELECT * FROM editions WHERE id = $1 AND published_at IS NOT NULL",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(edition_not_found)?;

        let categories = sqlx::query_as::<_, CategoryItem>(
            r#"
            SELECT id, label, sort_order AS "order"
            FROM categories
            WHERE edition_id = $1
            ORDER BY sort_order, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(EditionDetail {
            id: edition.id,
            title: edition.title,
            year: edition.edition_year,
            cover_img: edition.cover_img,
            categories,
        })
    }
}
