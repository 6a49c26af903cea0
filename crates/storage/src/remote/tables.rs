use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use stream_core::model::{
    ContentId, ContentItem, ContentKind, ContentOrder, Favorite, Progress, ProgressRecord, UserId,
    UserProfile,
};

use super::{HostedBackend, RestQuery, decode_error};
use crate::repository::{
    CatalogRepository, FavoriteRepository, ProgressRepository, StorageError, UserRepository,
};

const CONTENT: &str = "content";
const USER_PROGRESS: &str = "user_progress";
const USER_FAVORITES: &str = "user_favorites";
const USERS: &str = "users";

const PREFER_MERGE: &str = "resolution=merge-duplicates,return=minimal";
const PREFER_MINIMAL: &str = "return=minimal";
const PREFER_REPRESENTATION: &str = "return=representation";

/// Catalog row as served; presentation columns are nullable upstream.
#[derive(Debug, Deserialize)]
struct ContentRow {
    id: ContentId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(rename = "type")]
    kind: ContentKind,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
    created_at: DateTime<Utc>,
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
            kind: row.kind,
            rating: row.rating,
            year: row.year,
            duration: row.duration,
            category: row.category.unwrap_or_default(),
            featured: row.featured.unwrap_or(false),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            email: row.email.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// Progress row as served; the column is a plain JSON number upstream.
#[derive(Debug, Deserialize)]
struct ProgressRow {
    user_id: UserId,
    content_id: ContentId,
    progress: f64,
    last_watched: DateTime<Utc>,
}

impl ProgressRow {
    /// Fractional percentages are floored so a title never reads as finished early.
    fn into_record(self) -> Option<ProgressRecord> {
        if !self.progress.is_finite() {
            log::warn!(
                "skipping progress row for content {}: non-finite value",
                self.content_id
            );
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let percent = self.progress.floor() as i64;
        match Progress::new(percent) {
            Ok(progress) => Some(ProgressRecord::new(
                self.user_id,
                self.content_id,
                progress,
                self.last_watched,
            )),
            Err(err) => {
                log::warn!("skipping progress row for content {}: {err}", self.content_id);
                None
            }
        }
    }
}

fn progress_records(rows: Vec<ProgressRow>) -> Vec<ProgressRecord> {
    rows.into_iter().filter_map(ProgressRow::into_record).collect()
}

#[derive(Serialize)]
struct ProgressUpsert {
    user_id: UserId,
    content_id: ContentId,
    progress: Progress,
    last_watched: DateTime<Utc>,
}

#[derive(Serialize)]
struct FavoriteInsert {
    user_id: UserId,
    content_id: ContentId,
    created_at: DateTime<Utc>,
}

fn content_query(order: ContentOrder) -> RestQuery {
    let query = RestQuery::new().select("*");
    match order {
        ContentOrder::RatingDesc => query.order_desc("rating", true),
        ContentOrder::NewestFirst => query.order_desc("created_at", false),
    }
}

fn pair_query(user_id: UserId, content_id: ContentId) -> RestQuery {
    RestQuery::new()
        .eq("user_id", user_id)
        .eq("content_id", content_id.value())
}

impl HostedBackend {
    async fn write_rows<B: Serialize + Sync>(
        &self,
        method: Method,
        table: &str,
        query: &RestQuery,
        prefer: &'static str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, StorageError> {
        let url = self.rest_url(table, query)?;
        let mut builder = self
            .request(method, url)?
            .header("Prefer", HeaderValue::from_static(prefer));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::send(builder).await
    }
}

#[async_trait]
impl CatalogRepository for HostedBackend {
    async fn list_content(
        &self,
        order: ContentOrder,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ContentItem>, StorageError> {
        let mut query = content_query(order);
        if let Some(kind) = kind {
            query = query.eq("type", kind);
        }
        let rows: Vec<ContentRow> = self.fetch_rows(CONTENT, &query).await?;
        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn featured_content(&self, limit: u32) -> Result<Vec<ContentItem>, StorageError> {
        let query = RestQuery::new()
            .select("*")
            .eq("featured", true)
            .order_desc("rating", true)
            .limit(limit);
        let rows: Vec<ContentRow> = self.fetch_rows(CONTENT, &query).await?;
        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StorageError> {
        let query = RestQuery::new().select("*").eq("id", id.value()).limit(1);
        let rows: Vec<ContentRow> = self.fetch_rows(CONTENT, &query).await?;
        Ok(rows.into_iter().next().map(ContentItem::from))
    }
}

#[async_trait]
impl ProgressRepository for HostedBackend {
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let query = RestQuery::new()
            .select("user_id,content_id,progress,last_watched")
            .eq("user_id", user_id)
            .order_desc("last_watched", false);
        let rows: Vec<ProgressRow> = self.fetch_rows(USER_PROGRESS, &query).await?;
        Ok(progress_records(rows))
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let body = ProgressUpsert {
            user_id: record.user_id,
            content_id: record.content_id,
            progress: record.progress,
            last_watched: record.last_watched,
        };
        let query = RestQuery::new().on_conflict("user_id,content_id");
        self.write_rows(Method::POST, USER_PROGRESS, &query, PREFER_MERGE, Some(&body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl FavoriteRepository for HostedBackend {
    async fn list_favorites(&self, user_id: UserId) -> Result<Vec<Favorite>, StorageError> {
        let query = RestQuery::new()
            .select("*")
            .eq("user_id", user_id)
            .order_desc("created_at", false);
        self.fetch_rows(USER_FAVORITES, &query).await
    }

    async fn add_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
        created_at: DateTime<Utc>,
    ) -> Result<Favorite, StorageError> {
        let body = FavoriteInsert {
            user_id,
            content_id,
            created_at,
        };
        let response = self
            .write_rows(
                Method::POST,
                USER_FAVORITES,
                &RestQuery::new(),
                PREFER_REPRESENTATION,
                Some(&body),
            )
            .await?;
        let rows: Vec<Favorite> = response.json().await.map_err(decode_error)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StorageError::Serialization("insert returned no row".into()))
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<(), StorageError> {
        self.write_rows::<()>(
            Method::DELETE,
            USER_FAVORITES,
            &pair_query(user_id, content_id),
            PREFER_MINIMAL,
            None,
        )
        .await?;
        Ok(())
    }

    async fn is_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<bool, StorageError> {
        let query = pair_query(user_id, content_id).select("id").limit(1);
        let rows: Vec<serde_json::Value> = self.fetch_rows(USER_FAVORITES, &query).await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl UserRepository for HostedBackend {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StorageError> {
        let query = RestQuery::new().select("*").eq("id", user_id).limit(1);
        let rows: Vec<ProfileRow> = self.fetch_rows(USERS, &query).await?;
        Ok(rows.into_iter().next().map(UserProfile::from))
    }

    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.write_rows(
            Method::POST,
            USERS,
            &RestQuery::new(),
            PREFER_MINIMAL,
            Some(profile),
        )
        .await?;
        Ok(())
    }
}
