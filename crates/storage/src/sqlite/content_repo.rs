use sqlx::SqlitePool;
use stream_core::model::{ContentId, ContentItem, ContentKind, ContentOrder};

use super::SqliteRepository;
use super::mapping::{content_id_to_i64, db_err, map_content_row};
use crate::repository::{CatalogRepository, StorageError};

const CONTENT_COLUMNS: &str = "id, title, description, image_url, type, rating, year, duration, category, featured, created_at";

fn order_clause(order: ContentOrder) -> &'static str {
    match order {
        // NULL ratings sort last, ties fall back to id for a stable listing.
        ContentOrder::RatingDesc => "ORDER BY rating IS NULL, rating DESC, id ASC",
        ContentOrder::NewestFirst => "ORDER BY created_at DESC, id ASC",
    }
}

pub(super) async fn upsert(pool: &SqlitePool, item: &ContentItem) -> Result<(), StorageError> {
    sqlx::query(
        r"
        INSERT INTO content (id, title, description, image_url, type, rating, year, duration, category, featured, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            image_url = excluded.image_url,
            type = excluded.type,
            rating = excluded.rating,
            year = excluded.year,
            duration = excluded.duration,
            category = excluded.category,
            featured = excluded.featured
        ",
    )
    .bind(content_id_to_i64(item.id)?)
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.image_url)
    .bind(item.kind.as_str())
    .bind(item.rating.map(f64::from))
    .bind(item.year.map(i64::from))
    .bind(item.duration.as_deref())
    .bind(&item.category)
    .bind(i64::from(item.featured))
    .bind(item.created_at)
    .execute(pool)
    .await
    .map_err(db_err)?;
    Ok(())
}

#[async_trait::async_trait]
impl CatalogRepository for SqliteRepository {
    async fn list_content(
        &self,
        order: ContentOrder,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ContentItem>, StorageError> {
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE (?1 IS NULL OR type = ?1) {}",
            order_clause(order)
        );
        let rows = sqlx::query(&sql)
            .bind(kind.map(ContentKind::as_str))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_content_row).collect()
    }

    async fn featured_content(&self, limit: u32) -> Result<Vec<ContentItem>, StorageError> {
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE featured = 1 {} LIMIT ?1",
            order_clause(ContentOrder::RatingDesc)
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_content_row).collect()
    }

    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StorageError> {
        let sql = format!("SELECT {CONTENT_COLUMNS} FROM content WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(content_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(map_content_row).transpose()
    }
}
