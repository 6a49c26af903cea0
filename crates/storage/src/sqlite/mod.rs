use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use stream_core::model::ContentItem;
use thiserror::Error;

use crate::repository::{
    AuthRepository, CatalogRepository, FavoriteRepository, InMemoryRepository,
    ProgressRepository, Storage, StorageError, UserRepository,
};

mod content_repo;
mod favorite_repo;
mod mapping;
mod migrate;
mod progress_repo;
mod user_repo;

/// Local mirror of the hosted schema, for offline development.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// enforcing foreign key constraints fails during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        log::debug!("connected to {database_url}");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Insert or replace a catalog row. The hosted catalog is read-only, so
    /// this only exists on the local mirror (used by seeding).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn upsert_content(&self, item: &ContentItem) -> Result<(), StorageError> {
        content_repo::upsert(&self.pool, item).await
    }
}

impl Storage {
    /// Catalog, progress, favorites and profiles in `SQLite`; accounts in
    /// `accounts`.
    ///
    /// Accounts are not persisted locally, so every run starts signed out.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn local(
        repo: SqliteRepository,
        accounts: InMemoryRepository,
    ) -> Result<Self, SqliteInitError> {
        repo.migrate().await?;
        let auth: Arc<dyn AuthRepository> = Arc::new(accounts);
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let favorites: Arc<dyn FavoriteRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo);
        Ok(Self {
            auth,
            catalog,
            progress,
            favorites,
            users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }
}
