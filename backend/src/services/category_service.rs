//! Category and writer lookups.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::category::{CategoryOption, Writer};
use crate::validation::require_non_empty;

pub struct CategoryService {
    db: PgPool,
}

impl CategoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Categories holding at least one published article of the edition.
    pub async fn used_in_edition(&self, edition_id: i64) -> Result<Vec<CategoryOption>> {
        let categories = sqlx::query_as::<_, CategoryOption>(
            r#"
            SELECT DISTINCT c.id, c.label, c.sort_order
            FROM categories c
            JOIN articles a ON a.category_id = c.id
            WHERE a.edition_id = $1 AND a.status = 'published'
            ORDER BY c.sort_order, c.id
            "#,
        )
        .bind(edition_id)
        .fetch_all(&self.db)
        .await?;
        Ok(categories)
    }

    pub async fn list_writers(&self) -> Result<Vec<Writer>> {
        let writers =
            sqlx::query_as::<_, Writer>("SELECT id, writer_name FROM writers ORDER BY writer_name")
                .fetch_all(&self.db)
                .await?;
        Ok(writers)
    }

    pub async fn create_writer(&self, name: &str) -> Result<Writer> {
        require_non_empty("writerName", name)?;

        let writer = sqlx::query_as::<_, Writer>(
            "INSERT INTO writers (writer_name) VALUES ($1) RETURNING id, writer_name",
        )
        .bind(name.trim())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(writer_id = writer.id, "Created writer");
        Ok(writer)
    }
}
