//! Parish announcements ("berita").

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::announcement::{Announcement, AnnouncementDetail, AnnouncementSummary};
use crate::storage::asset_path::{announcement_key, PLACEHOLDER_IMAGE};
use crate::storage::ObjectStore;
use crate::validation::{require_non_empty, validate_upload_request};

fn announcement_not_found() -> AppError {
    AppError::not_found("berita not found")
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub section: String,
    pub descriptions: String,
    pub details: String,
    pub publish_start: DateTime<Utc>,
    pub publish_end: DateTime<Utc>,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct CreatedAnnouncement {
    pub id: i64,
    pub url: String,
    pub location: String,
}

/// Parse an RFC 3339 publishing window and check its order.
pub fn parse_publish_window(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = DateTime::parse_from_rfc3339(start)
        .map_err(|e| AppError::invalid("invalid publishStart format (use RFC 3339)", e.to_string()))?
        .with_timezone(&Utc);
    let end = DateTime::parse_from_rfc3339(end)
        .map_err(|e| AppError::invalid("invalid publishEnd format (use RFC 3339)", e.to_string()))?
        .with_timezone(&Utc);
    if start > end {
        return Err(AppError::invalid(
            "invalid publishing window",
            "publishStart must not be after publishEnd",
        ));
    }
    Ok((start, end))
}

pub struct AnnouncementService {
    db: PgPool,
    store: Arc<dyn ObjectStore>,
    upload_expiry: Duration,
}

impl AnnouncementService {
    pub fn new(db: PgPool, store: Arc<dyn ObjectStore>, upload_expiry: Duration) -> Self {
        Self {
            db,
            store,
            upload_expiry,
        }
    }

    pub async fn list(&self) -> Result<Vec<Announcement>> {
        let items = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, title, section, thumb_img, descriptions, details,
                   created_at, publish_start, publish_end
            FROM announcements
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    /// Announcements whose publishing window contains the current time,
    /// latest start first.
    pub async fn published(&self) -> Result<Vec<AnnouncementSummary>> {
        let items = sqlx::query_as::<_, AnnouncementSummary>(
            r#"
            SELECT id, title, section, thumb_img, descriptions
            FROM announcements
            WHERE deleted_at IS NULL
              AND publish_start <= now()
              AND publish_end >= now()
            ORDER BY publish_start DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    /// Any non-deleted announcement, regardless of its window.
    pub async fn detail(&self, id: i64) -> Result<AnnouncementDetail> {
        sqlx::query_as::<_, AnnouncementDetail>(
            r#"
            SELECT id, title, section, thumb_img, descriptions, details
            FROM announcements
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(announcement_not_found)
    }

    /// Point the thumbnail at an already uploaded object.
    pub async fn update_thumbnail(&self, id: i64, obj_path: &str) -> Result<()> {
        if obj_path.trim().is_empty() {
            return Err(AppError::invalid_body("empty object path"));
        }
        let result = sqlx::query(
            "UPDATE announcements SET thumb_img = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(obj_path)
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(announcement_not_found());
        }
        tracing::info!(announcement_id = id, thumb_img = %obj_path, "Updated announcement thumbnail");
        Ok(())
    }

    /// Insert the announcement with a placeholder thumbnail and hand back a
    /// signed URL for uploading the real one.
    pub async fn create(&self, input: NewAnnouncement) -> Result<CreatedAnnouncement> {
        require_non_empty("title", &input.title)?;
        require_non_empty("section", &input.section)?;
        require_non_empty("descriptions", &input.descriptions)?;
        validate_upload_request(&input.file_name, &input.content_type)?;
        if input.publish_start > input.publish_end {
            return Err(AppError::invalid(
                "invalid publishing window",
                "publishStart must not be after publishEnd",
            ));
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO announcements
                (title, section, thumb_img, descriptions, details, publish_start, publish_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.section)
        .bind(PLACEHOLDER_IMAGE)
        .bind(&input.descriptions)
        .bind(&input.details)
        .bind(input.publish_start)
        .bind(input.publish_end)
        .fetch_one(&self.db)
        .await?;

        let location = announcement_key(id, &input.file_name);
        let url = self
            .store
            .signed_upload_url(&location, &input.content_type, self.upload_expiry)
            .await?;

        tracing::info!(announcement_id = id, "Created announcement");
        Ok(CreatedAnnouncement { id, url, location })
    }

    pub async fn update_publishing(
        &self,
        id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE announcements SET publish_start = $2, publish_end = $3
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(start)
        .bind(end)
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(announcement_not_found());
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM announcements WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;
        if !exists {
            return Err(announcement_not_found());
        }

        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(announcement_not_found());
        }
        tracing::info!(announcement_id = id, "Deleted announcement");
        Ok(())
    }
}
