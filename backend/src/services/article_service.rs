//! Article service: creation, lifecycle transitions, editing and reads.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::article::{
    Article, ArticleContent, ArticleDetail, ArticleInfo, ArticleListItem, ArticleStatus,
    ArticleSummary,
};
use crate::models::category::{CategoryOption, UNCATEGORIZED_ID, UNKNOWN_WRITER_ID};
use crate::services::is_foreign_key_violation;
use crate::services::lifecycle::{ArticleLifecycle, LifecycleChange};
use crate::storage::asset_path::PLACEHOLDER_IMAGE;
use crate::validation::format_slug;

pub const UNTITLED_ARTICLE: &str = "Untitled Article";

const LIST_ITEM_COLUMNS: &str = r#"
    a.id, a.title, w.writer_name AS writer, c.label AS category, a.edition_id,
    a.status, a.published_date, a.updated_at
"#;

fn article_not_found() -> AppError {
    AppError::not_found("article not found")
}

pub struct ArticleService {
    db: PgPool,
}

impl ArticleService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Insert a draft with placeholder title, images and sentinel references.
    pub async fn create(&self, edition_id: i64) -> Result<i64> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO articles (
                edition_id, title, slug, category_id, writer_id,
                cover_img, thumb_img, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6, 'draft', $7, $7)
            RETURNING id
            "#,
        )
        .bind(edition_id)
        .bind(UNTITLED_ARTICLE)
        .bind(format_slug(UNTITLED_ARTICLE))
        .bind(UNCATEGORIZED_ID)
        .bind(UNKNOWN_WRITER_ID)
        .bind(PLACEHOLDER_IMAGE)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found("edition not found")
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!(article_id = id, edition_id, "Created draft article");
        Ok(id)
    }

    async fn current_lifecycle(&self, id: i64) -> Result<ArticleLifecycle> {
        let row: Option<(ArticleStatus, Option<DateTime<Utc>>, Option<DateTime<Utc>>)> =
            sqlx::query_as(
                "SELECT status, published_date, archived_date FROM articles WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        let (status, published, archived) = row.ok_or_else(article_not_found)?;
        ArticleLifecycle::from_columns(status, published, archived)
    }

    async fn apply_transition(
        &self,
        id: i64,
        transition: impl FnOnce(ArticleLifecycle, DateTime<Utc>) -> ArticleLifecycle,
    ) -> Result<LifecycleChange> {
        let current = self.current_lifecycle(id).await?;
        let now = Utc::now();
        let next = transition(current, now);

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET status = $2, published_date = $3, archived_date = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(next.status())
        .bind(next.published_date())
        .bind(next.archived_date())
        .bind(now)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(article_not_found());
        }

        tracing::info!(article_id = id, from = %current.status(), to = %next.status(), "Article state changed");
        Ok(LifecycleChange::new(id, next))
    }

    pub async fn publish(&self, id: i64) -> Result<LifecycleChange> {
        self.apply_transition(id, ArticleLifecycle::publish).await
    }

    pub async fn archive(&self, id: i64) -> Result<LifecycleChange> {
        self.apply_transition(id, ArticleLifecycle::archive).await
    }

    pub async fn delete_permanent(&self, id: i64) -> Result<()> {
        self.ensure_exists(id).await?;

        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(article_not_found());
        }

        tracing::info!(article_id = id, "Permanently deleted article");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Replace the article body. Last writer wins.
    pub async fn save_draft(&self, id: i64, contents: &serde_json::Value) -> Result<DateTime<Utc>> {
        self.ensure_exists(id).await?;

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE articles SET content_json = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(contents)
        .bind(now)
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(article_not_found());
        }
        Ok(now)
    }

    /// Update title, category and writer; the slug is recomputed from the title.
    pub async fn save_attributes(
        &self,
        id: i64,
        title: &str,
        category_id: i64,
        writer_id: i64,
    ) -> Result<String> {
        self.ensure_exists(id).await?;

        let slug = format_slug(title);
        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = $2, slug = $3, category_id = $4, writer_id = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(&slug)
        .bind(category_id)
        .bind(writer_id)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::invalid("invalid category or writer", e.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(article_not_found());
        }
        Ok(slug)
    }

    pub async fn ensure_exists(&self, id: i64) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        if !exists {
            return Err(article_not_found());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Editor reads
    // -----------------------------------------------------------------------

    pub async fn get(&self, id: i64) -> Result<Article> {
        sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(article_not_found)
    }

    pub async fn info(&self, id: i64) -> Result<ArticleInfo> {
        sqlx::query_as::<_, ArticleInfo>(
            "SELECT id, title, writer_id, category_id FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(article_not_found)
    }

    pub async fn content(&self, id: i64) -> Result<ArticleContent> {
        sqlx::query_as::<_, ArticleContent>(
            "SELECT id, content_json AS contents FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(article_not_found)
    }

    pub async fn list_drafts(&self) -> Result<Vec<ArticleListItem>> {
        let items = sqlx::query_as::<_, ArticleListItem>(&format!(
            r#"
            SELECT {LIST_ITEM_COLUMNS}
            FROM articles a
            JOIN writers w ON w.id = a.writer_id
            JOIN categories c ON c.id = a.category_id
            WHERE a.status = 'draft'
            ORDER BY a.updated_at DESC
            "#
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    pub async fn list_by_edition(&self, edition_id: i64) -> Result<Vec<ArticleListItem>> {
        let items = sqlx::query_as::<_, ArticleListItem>(&format!(
            r#"
            SELECT {LIST_ITEM_COLUMNS}
            FROM articles a
            JOIN writers w ON w.id = a.writer_id
            JOIN categories c ON c.id = a.category_id
            WHERE a.edition_id = $1
            ORDER BY a.updated_at DESC
            "#
        ))
        .bind(edition_id)
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    /// Categories an article may be filed under: its edition's plus the
    /// shared "Uncategorized" entry.
    pub async fn category_options(&self, id: i64) -> Result<Vec<CategoryOption>> {
        let edition_id: i64 = sqlx::query_scalar("SELECT edition_id FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(article_not_found)?;

        let options = sqlx::query_as::<_, CategoryOption>(
            r#"
            SELECT id, label FROM categories
            WHERE edition_id = $1 OR id = $2
            ORDER BY (id = $2) DESC, sort_order, id
            "#,
        )
        .bind(edition_id)
        .bind(UNCATEGORIZED_ID)
        .fetch_all(&self.db)
        .await?;
        Ok(options)
    }

    // -----------------------------------------------------------------------
    // Reader reads (published only)
    // -----------------------------------------------------------------------

    pub async fn published_in_category(&self, category_id: i64) -> Result<Vec<ArticleSummary>> {
        let items = sqlx::query_as::<_, ArticleSummary>(
            r#"
            SELECT a.id, a.title, a.slug, w.writer_name, a.published_date,
                   a.thumb_img, a.thumb_text, a.edition_id, e.edition_year
            FROM articles a
            JOIN writers w ON w.id = a.writer_id
            JOIN editions e ON e.id = a.edition_id
            WHERE a.category_id = $1 AND a.status = 'published'
            ORDER BY a.published_date DESC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    pub async fn published_detail(
        &self,
        year: i32,
        edition_id: i64,
        slug: &str,
    ) -> Result<ArticleDetail> {
        sqlx::query_as::<_, ArticleDetail>(
            r#"
            SELECT a.id, a.title, a.slug, w.writer_name, a.published_date, a.cover_img,
                   c.label AS category, a.content_json, a.ads_json
            FROM articles a
            JOIN writers w ON w.id = a.writer_id
            JOIN categories c ON c.id = a.category_id
            JOIN editions e ON e.id = a.edition_id
            WHERE e.edition_year = $1 AND a.edition_id = $2 AND a.slug = $3
              AND a.status = 'published'
            ORDER BY a.published_date DESC
            LIMIT 1
            "#,
        )
        .bind(year)
        .bind(edition_id)
        .bind(slug)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(article_not_found)
    }

    /// Published top-content articles of an edition, or of the active
    /// edition when none is given.
    pub async fn top_content(&self, edition_id: Option<i64>) -> Result<Vec<ArticleSummary>> {
        let items = sqlx::query_as::<_, ArticleSummary>(
            r#"
            SELECT a.id, a.title, a.slug, w.writer_name, a.published_date,
                   a.thumb_img, a.thumb_text, a.edition_id, e.edition_year
            FROM articles a
            JOIN writers w ON w.id = a.writer_id
            JOIN editions e ON e.id = a.edition_id
            WHERE a.is_top_content AND a.status = 'published'
              AND a.edition_id = COALESCE($1, (SELECT edition_id FROM active_edition))
            ORDER BY a.published_date DESC
            "#,
        )
        .bind(edition_id)
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }
}
