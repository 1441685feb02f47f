//! Cover image workflows: signed uploads, thumbnail pointers and relocation.
//!
//! A relocation keeps the owner's `cover_img`/`thumb_img` columns and the
//! object keys in step. The column update is staged in a transaction that is
//! committed only after both objects have moved; on failure the transaction
//! is rolled back and any move that already happened is reversed on a best
//! effort basis. The relocation runs in its own task, so a caller that
//! stops waiting (request deadline, client disconnect) cannot interrupt that
//! compensation. A crash between the moves and the commit can still leave
//! the two sides apart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::models::edition::CoverPaths;
use crate::storage::asset_path::{
    ensure_not_placeholder, owner_key, plan_relocation, AssetOwner, RelocationPlan,
    ThumbnailConvention,
};
use crate::storage::ObjectStore;
use crate::validation::{
    validate_relocation_filename, validate_rename_filename, validate_upload_request, RenameSource,
};

/// Signed upload URL and the object key it writes to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadTicket {
    pub url: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    pub id: i64,
    pub cover_img: String,
    pub thumbnail_img: Option<String>,
    pub updated_at: DateTime<Utc>,
}

fn table(owner: AssetOwner) -> &'static str {
    match owner {
        AssetOwner::Article => "articles",
        AssetOwner::Edition => "editions",
    }
}

fn owner_not_found(owner: AssetOwner) -> AppError {
    AppError::not_found(format!("{} not found", owner.label()))
}

#[derive(Clone)]
pub struct AssetService {
    db: PgPool,
    store: Arc<dyn ObjectStore>,
    convention: ThumbnailConvention,
    upload_expiry: Duration,
}

impl AssetService {
    pub fn new(
        db: PgPool,
        store: Arc<dyn ObjectStore>,
        convention: ThumbnailConvention,
        upload_expiry: Duration,
    ) -> Self {
        Self {
            db,
            store,
            convention,
            upload_expiry,
        }
    }

    /// Year of the edition an article or edition belongs to.
    async fn owner_year(&self, owner: AssetOwner, id: i64) -> Result<i32> {
        let sql = match owner {
            AssetOwner::Article => {
                r#"
                SELECT e.edition_year FROM articles a
                JOIN editions e ON e.id = a.edition_id
                WHERE a.id = $1
                "#
            }
            AssetOwner::Edition => "SELECT edition_year FROM editions WHERE id = $1",
        };
        sqlx::query_scalar(sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| owner_not_found(owner))
    }

    /// Issue a short-lived PUT URL for an image under the owner's prefix.
    pub async fn issue_upload_url(
        &self,
        owner: AssetOwner,
        id: i64,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadTicket> {
        validate_upload_request(file_name, content_type)?;
        let year = self.owner_year(owner, id).await?;

        let location = owner_key(owner, year, id, file_name);
        let url = self
            .store
            .signed_upload_url(&location, content_type, self.upload_expiry)
            .await?;

        tracing::debug!(owner = owner.label(), id, location = %location, "Issued upload URL");
        Ok(UploadTicket { url, location })
    }

    pub async fn cover_paths(&self, owner: AssetOwner, id: i64) -> Result<CoverPaths> {
        let sql = format!(
            "SELECT id, cover_img, thumb_img AS thumbnail_img FROM {} WHERE id = $1",
            table(owner)
        );
        sqlx::query_as::<_, CoverPaths>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| owner_not_found(owner))
    }

    /// Point the thumbnail column at `file_name`. No storage call.
    pub async fn update_thumbnail(&self, owner: AssetOwner, id: i64, file_name: &str) -> Result<()> {
        if file_name.trim().is_empty() {
            return Err(AppError::invalid_body("empty filename"));
        }

        let sql = format!(
            "UPDATE {} SET thumb_img = $2, updated_at = $3 WHERE id = $1",
            table(owner)
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(file_name)
            .bind(Utc::now())
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(owner_not_found(owner));
        }
        Ok(())
    }

    pub async fn rename_cover(
        &self,
        owner: AssetOwner,
        id: i64,
        field: &str,
        new_file_name: &str,
        source: RenameSource,
    ) -> Result<RenameOutcome> {
        match source {
            RenameSource::GoogleCloud => self.repoint_cover(owner, id, field, new_file_name).await,
            RenameSource::UserInput => {
                let service = self.clone();
                let field = field.to_string();
                let new_file_name = new_file_name.to_string();
                tokio::spawn(async move {
                    service
                        .relocate_cover(owner, id, &field, &new_file_name)
                        .await
                })
                .await
                .map_err(|e| AppError::Internal(format!("relocation task failed: {}", e)))?
            }
        }
    }

    /// The object is already at its final key; only the pointer changes.
    async fn repoint_cover(
        &self,
        owner: AssetOwner,
        id: i64,
        field: &str,
        new_cover: &str,
    ) -> Result<RenameOutcome> {
        validate_rename_filename(field, new_cover)?;

        let now = Utc::now();
        let sql = format!(
            "UPDATE {} SET cover_img = $2, updated_at = $3 WHERE id = $1",
            table(owner)
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(new_cover)
            .bind(now)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(owner_not_found(owner));
        }

        Ok(RenameOutcome {
            id,
            cover_img: new_cover.to_string(),
            thumbnail_img: None,
            updated_at: now,
        })
    }

    async fn relocate_cover(
        &self,
        owner: AssetOwner,
        id: i64,
        field: &str,
        new_file_name: &str,
    ) -> Result<RenameOutcome> {
        let sql = match owner {
            AssetOwner::Article => {
                r#"
                SELECT a.cover_img, a.thumb_img, e.edition_year
                FROM articles a
                JOIN editions e ON e.id = a.edition_id
                WHERE a.id = $1
                "#
            }
            AssetOwner::Edition => {
                "SELECT cover_img, thumb_img, edition_year FROM editions WHERE id = $1"
            }
        };
        let (cover, thumb, year): (String, String, i32) = sqlx::query_as(sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| owner_not_found(owner))?;

        // Placeholders are refused before the new name is even looked at.
        ensure_not_placeholder(&cover, &thumb)?;
        validate_relocation_filename(field, new_file_name)?;

        let plan = plan_relocation(owner, year, id, &cover, &thumb, new_file_name, self.convention)?;
        let updated_at = self.apply_relocation(owner, id, &plan).await?;

        tracing::info!(
            owner = owner.label(),
            id,
            cover = %plan.new_cover_key,
            thumbnail = %plan.new_thumb_key,
            "Relocated cover image"
        );
        Ok(RenameOutcome {
            id,
            cover_img: plan.new_cover_column,
            thumbnail_img: Some(plan.new_thumb_column),
            updated_at,
        })
    }

    async fn apply_relocation(
        &self,
        owner: AssetOwner,
        id: i64,
        plan: &RelocationPlan,
    ) -> Result<DateTime<Utc>> {
        let mut tx = self.db.begin().await?;

        let sql = format!(
            "UPDATE {} SET cover_img = $2, thumb_img = $3 WHERE id = $1",
            table(owner)
        );
        let staged = sqlx::query(&sql)
            .bind(id)
            .bind(&plan.new_cover_column)
            .bind(&plan.new_thumb_column)
            .execute(&mut *tx)
            .await;
        match staged {
            Ok(result) if result.rows_affected() == 0 => {
                tx.rollback().await?;
                return Err(owner_not_found(owner));
            }
            Ok(_) => {}
            Err(e) => {
                tx.rollback().await?;
                return Err(e.into());
            }
        }

        if let Err(e) = self
            .store
            .move_object(&plan.old_cover_key, &plan.new_cover_key)
            .await
        {
            tx.rollback().await?;
            return Err(e);
        }

        let thumb_attrs = match self
            .store
            .move_object(&plan.old_thumb_key, &plan.new_thumb_key)
            .await
        {
            Ok(attrs) => attrs,
            Err(e) => {
                self.reverse_moves(&[(&plan.old_cover_key, &plan.new_cover_key)])
                    .await;
                tx.rollback().await?;
                return Err(e);
            }
        };

        let sql = format!("UPDATE {} SET updated_at = $2 WHERE id = $1", table(owner));
        let finished = async {
            sqlx::query(&sql)
                .bind(id)
                .bind(thumb_attrs.updated)
                .execute(&mut *tx)
                .await?;
            tx.commit().await
        }
        .await;

        if let Err(e) = finished {
            self.reverse_moves(&[
                (&plan.old_cover_key, &plan.new_cover_key),
                (&plan.old_thumb_key, &plan.new_thumb_key),
            ])
            .await;
            return Err(e.into());
        }

        Ok(thumb_attrs.updated)
    }

    /// Move objects back to where they were. Failures are logged only.
    async fn reverse_moves(&self, moves: &[(&str, &str)]) {
        for (original, moved_to) in moves {
            match self.store.move_object(moved_to, original).await {
                Ok(_) => tracing::warn!(from = %moved_to, to = %original, "Reverted object move"),
                Err(e) => tracing::error!(
                    from = %moved_to,
                    to = %original,
                    error = %e,
                    "Failed to revert object move; database and storage disagree"
                ),
            }
        }
    }
}
