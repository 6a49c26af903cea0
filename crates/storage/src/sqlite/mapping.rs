use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use stream_core::model::{
    ContentId, ContentItem, ContentKind, Favorite, FavoriteId, Progress, ProgressRecord, UserId,
    UserProfile,
};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Unique violations become `Conflict`, dangling foreign keys `NotFound`.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
        if db.is_foreign_key_violation() {
            return StorageError::NotFound;
        }
    }
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn content_id_to_i64(id: ContentId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("content_id overflow".into()))
}

pub(crate) fn content_id_from_i64(v: i64) -> Result<ContentId, StorageError> {
    Ok(ContentId::new(i64_to_u64("content_id", v)?))
}

pub(crate) fn user_id_to_text(id: UserId) -> String {
    id.to_string()
}

pub(crate) fn user_id_from_text(raw: &str) -> Result<UserId, StorageError> {
    raw.parse().map_err(ser)
}

pub(crate) fn map_content_row(row: &SqliteRow) -> Result<ContentItem, StorageError> {
    let kind: String = row.try_get("type").map_err(ser)?;
    let kind: ContentKind = kind.parse().map_err(ser)?;
    let rating: Option<f64> = row.try_get("rating").map_err(ser)?;
    #[allow(clippy::cast_possible_truncation)]
    let rating = rating.map(|r| r as f32);
    let year: Option<i64> = row.try_get("year").map_err(ser)?;
    let year = year
        .map(|y| {
            i32::try_from(y).map_err(|_| StorageError::Serialization(format!("invalid year: {y}")))
        })
        .transpose()?;

    Ok(ContentItem {
        id: content_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        image_url: row.try_get("image_url").map_err(ser)?,
        kind,
        rating,
        year,
        duration: row.try_get("duration").map_err(ser)?,
        category: row.try_get("category").map_err(ser)?,
        featured: row.try_get::<i64, _>("featured").map_err(ser)? != 0,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    let progress: i64 = row.try_get("progress").map_err(ser)?;
    Ok(ProgressRecord {
        user_id: user_id_from_text(&user_id)?,
        content_id: content_id_from_i64(row.try_get::<i64, _>("content_id").map_err(ser)?)?,
        progress: Progress::new(progress).map_err(ser)?,
        last_watched: row.try_get("last_watched").map_err(ser)?,
    })
}

pub(crate) fn map_favorite_row(row: &SqliteRow) -> Result<Favorite, StorageError> {
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    Ok(Favorite {
        id: FavoriteId::new(i64_to_u64("id", row.try_get::<i64, _>("id").map_err(ser)?)?),
        user_id: user_id_from_text(&user_id)?,
        content_id: content_id_from_i64(row.try_get::<i64, _>("content_id").map_err(ser)?)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_profile_row(row: &SqliteRow) -> Result<UserProfile, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    Ok(UserProfile {
        id: user_id_from_text(&id)?,
        email: row.try_get("email").map_err(ser)?,
        name: row.try_get("name").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
