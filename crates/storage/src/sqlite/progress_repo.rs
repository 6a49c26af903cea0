use stream_core::model::{ProgressRecord, UserId};

use super::SqliteRepository;
use super::mapping::{content_id_to_i64, db_err, map_progress_row, user_id_to_text};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, content_id, progress, last_watched
            FROM user_progress
            WHERE user_id = ?1
            ORDER BY last_watched DESC, content_id ASC
            ",
        )
        .bind(user_id_to_text(user_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_progress_row).collect()
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_progress (user_id, content_id, progress, last_watched)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, content_id) DO UPDATE SET
                progress = excluded.progress,
                last_watched = excluded.last_watched
            ",
        )
        .bind(user_id_to_text(record.user_id))
        .bind(content_id_to_i64(record.content_id)?)
        .bind(i64::from(record.progress))
        .bind(record.last_watched)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
