use chrono::{DateTime, Utc};
use stream_core::model::{ContentId, Favorite, FavoriteId, UserId};

use super::SqliteRepository;
use super::mapping::{content_id_to_i64, db_err, map_favorite_row, user_id_to_text};
use crate::repository::{FavoriteRepository, StorageError};

#[async_trait::async_trait]
impl FavoriteRepository for SqliteRepository {
    async fn list_favorites(&self, user_id: UserId) -> Result<Vec<Favorite>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, content_id, created_at
            FROM user_favorites
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id_to_text(user_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_favorite_row).collect()
    }

    async fn add_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
        created_at: DateTime<Utc>,
    ) -> Result<Favorite, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO user_favorites (user_id, content_id, created_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(user_id_to_text(user_id))
        .bind(content_id_to_i64(content_id)?)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("favorite id sign overflow".into()))?;
        Ok(Favorite {
            id: FavoriteId::new(id),
            user_id,
            content_id,
            created_at,
        })
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM user_favorites WHERE user_id = ?1 AND content_id = ?2")
            .bind(user_id_to_text(user_id))
            .bind(content_id_to_i64(content_id)?)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn is_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM user_favorites WHERE user_id = ?1 AND content_id = ?2")
            .bind(user_id_to_text(user_id))
            .bind(content_id_to_i64(content_id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.is_some())
    }
}
