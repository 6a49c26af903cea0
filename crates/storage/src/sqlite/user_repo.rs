use stream_core::model::{UserId, UserProfile};

use super::SqliteRepository;
use super::mapping::{db_err, map_profile_row, user_id_to_text};
use crate::repository::{StorageError, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query("SELECT id, email, name, created_at FROM users WHERE id = ?1")
            .bind(user_id_to_text(user_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(map_profile_row).transpose()
    }

    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO users (id, email, name, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(user_id_to_text(profile.id))
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(profile.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
