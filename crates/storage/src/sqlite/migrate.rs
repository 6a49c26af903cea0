use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Creates the catalog, profile, progress and favorites tables.
///
/// Column names follow the hosted schema so rows map one-to-one.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if is_applied(pool, 1).await? {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS content (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                image_url TEXT NOT NULL DEFAULT '',
                type TEXT NOT NULL CHECK (type IN ('movie', 'series')),
                rating REAL,
                year INTEGER,
                duration TEXT,
                category TEXT NOT NULL,
                featured INTEGER NOT NULL DEFAULT 0 CHECK (featured IN (0, 1)),
                created_at TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS user_progress (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                content_id INTEGER NOT NULL,
                progress INTEGER NOT NULL CHECK (progress BETWEEN 0 AND 100),
                last_watched TEXT NOT NULL,
                UNIQUE (user_id, content_id),
                FOREIGN KEY (content_id) REFERENCES content(id) ON DELETE CASCADE
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS user_favorites (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                content_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (user_id, content_id),
                FOREIGN KEY (content_id) REFERENCES content(id) ON DELETE CASCADE
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_content_rating
                ON content (rating DESC);
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_user_progress_user_last_watched
                ON user_progress (user_id, last_watched);
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(1_i64)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!("applied sqlite schema version 1");

    Ok(())
}
