use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use stream_core::model::{
    ContentId, ContentItem, ContentKind, ContentOrder, Credentials, Favorite, FavoriteId,
    ProgressRecord, Session, UserId, UserProfile, sort_content,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result of creating an account.
///
/// The backend may hold the session back until the email is confirmed, in
/// which case `session` is `None` but the account already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user_id: UserId,
    pub email: String,
    pub session: Option<Session>,
}

/// Account and session operations of the auth backend.
///
/// Implementations keep the current session themselves, the way a browser
/// client keeps it in local storage.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        name: &str,
    ) -> Result<Registration, StorageError>;

    /// Exchange credentials for a session and remember it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` on bad credentials.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, StorageError>;

    /// Drop the current session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the logout.
    async fn sign_out(&self) -> Result<(), StorageError>;

    /// The remembered session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be read.
    async fn current_session(&self) -> Result<Option<Session>, StorageError>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List the catalog in the given order, optionally restricted to one kind.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_content(
        &self,
        order: ContentOrder,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ContentItem>, StorageError>;

    /// Featured titles, highest rated first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn featured_content(&self, limit: u32) -> Result<Vec<ContentItem>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. A missing row is `Ok(None)`.
    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StorageError>;
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// A user's progress rows, most recently watched first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Insert or replace the row for `(user_id, content_id)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_favorites(&self, user_id: UserId) -> Result<Vec<Favorite>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the title is already a favorite.
    async fn add_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
        created_at: DateTime<Utc>,
    ) -> Result<Favorite, StorageError>;

    /// Removing a title that is not a favorite is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn remove_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn is_favorite(&self, user_id: UserId, content_id: ContentId)
    -> Result<bool, StorageError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. A missing row is `Ok(None)`.
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a profile already exists for the id.
    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

struct Account {
    user_id: UserId,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    session: Option<Session>,
    content: BTreeMap<ContentId, ContentItem>,
    progress: HashMap<(UserId, ContentId), ProgressRecord>,
    favorites: Vec<Favorite>,
    next_favorite_id: u64,
    profiles: HashMap<UserId, UserProfile>,
}

/// Simple in-memory backend for tests and offline runs.
///
/// Accounts live only as long as the process.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Add or replace a catalog row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the state lock is poisoned.
    pub fn upsert_content(&self, item: ContentItem) -> Result<(), StorageError> {
        self.lock()?.content.insert(item.id, item);
        Ok(())
    }

    /// Register an account under a known id without signing it in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    pub fn insert_account(
        &self,
        user_id: UserId,
        credentials: &Credentials,
    ) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let email = credentials.email().to_ascii_lowercase();
        if state.accounts.contains_key(&email) {
            return Err(StorageError::Conflict);
        }
        state.accounts.insert(
            email,
            Account {
                user_id,
                password: credentials.password().to_owned(),
            },
        );
        Ok(())
    }
}

fn issue_session(user_id: UserId, email: &str) -> Session {
    Session::new(uuid::Uuid::new_v4().simple().to_string(), user_id, email, None)
}

#[async_trait]
impl AuthRepository for InMemoryRepository {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        _name: &str,
    ) -> Result<Registration, StorageError> {
        let mut state = self.lock()?;
        let email = credentials.email().to_ascii_lowercase();
        if state.accounts.contains_key(&email) {
            return Err(StorageError::Conflict);
        }
        let user_id = UserId::random();
        state.accounts.insert(
            email.clone(),
            Account {
                user_id,
                password: credentials.password().to_owned(),
            },
        );
        let session = issue_session(user_id, &email);
        state.session = Some(session.clone());
        Ok(Registration {
            user_id,
            email,
            session: Some(session),
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, StorageError> {
        let mut state = self.lock()?;
        let email = credentials.email().to_ascii_lowercase();
        let user_id = match state.accounts.get(&email) {
            Some(account) if account.password == credentials.password() => account.user_id,
            _ => {
                return Err(StorageError::Unauthorized(
                    "invalid login credentials".into(),
                ));
            }
        };
        let session = issue_session(user_id, &email);
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        self.lock()?.session = None;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, StorageError> {
        Ok(self.lock()?.session.clone())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn list_content(
        &self,
        order: ContentOrder,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ContentItem>, StorageError> {
        let state = self.lock()?;
        let mut items: Vec<ContentItem> = state
            .content
            .values()
            .filter(|item| kind.is_none_or(|k| item.kind == k))
            .cloned()
            .collect();
        sort_content(&mut items, order);
        Ok(items)
    }

    async fn featured_content(&self, limit: u32) -> Result<Vec<ContentItem>, StorageError> {
        let mut items = self.list_content(ContentOrder::RatingDesc, None).await?;
        items.retain(|item| item.featured);
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(items)
    }

    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StorageError> {
        Ok(self.lock()?.content.get(&id).cloned())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let state = self.lock()?;
        let mut rows: Vec<ProgressRecord> = state
            .progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.last_watched
                .cmp(&a.last_watched)
                .then(a.content_id.cmp(&b.content_id))
        });
        Ok(rows)
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        self.lock()?
            .progress
            .insert((record.user_id, record.content_id), record.clone());
        Ok(())
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryRepository {
    async fn list_favorites(&self, user_id: UserId) -> Result<Vec<Favorite>, StorageError> {
        let state = self.lock()?;
        let mut rows: Vec<Favorite> = state
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn add_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
        created_at: DateTime<Utc>,
    ) -> Result<Favorite, StorageError> {
        let mut state = self.lock()?;
        if state
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.content_id == content_id)
        {
            return Err(StorageError::Conflict);
        }
        state.next_favorite_id += 1;
        let favorite = Favorite {
            id: FavoriteId::new(state.next_favorite_id),
            user_id,
            content_id,
            created_at,
        };
        state.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<(), StorageError> {
        self.lock()?
            .favorites
            .retain(|f| !(f.user_id == user_id && f.content_id == content_id));
        Ok(())
    }

    async fn is_favorite(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<bool, StorageError> {
        Ok(self
            .lock()?
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.content_id == content_id))
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StorageError> {
        Ok(self.lock()?.profiles.get(&user_id).cloned())
    }

    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if state.profiles.contains_key(&profile.id) {
            return Err(StorageError::Conflict);
        }
        state.profiles.insert(profile.id, profile.clone());
        Ok(())
    }
}

/// Aggregates the backend contracts behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub auth: Arc<dyn AuthRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(InMemoryRepository::new())
    }

    /// Wrap an existing in-memory repository so callers can keep a handle for seeding.
    #[must_use]
    pub fn from_memory(repo: InMemoryRepository) -> Self {
        Self {
            auth: Arc::new(repo.clone()),
            catalog: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            favorites: Arc::new(repo.clone()),
            users: Arc::new(repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stream_core::model::Progress;
    use stream_core::time::fixed_now;

    fn creds(email: &str) -> Credentials {
        Credentials::new(email, "secret1").unwrap()
    }

    fn item(id: u64, kind: ContentKind, rating: f32) -> ContentItem {
        ContentItem::new(ContentId::new(id), format!("T{id}"), "Drama", kind, fixed_now())
            .with_rating(rating)
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_keeps_session() {
        let repo = InMemoryRepository::new();
        let reg = repo.sign_up(&creds("Ana@Example.com"), "Ana").await.unwrap();
        assert_eq!(reg.email, "ana@example.com");

        repo.sign_out().await.unwrap();
        assert!(repo.current_session().await.unwrap().is_none());

        let session = repo.sign_in(&creds("ana@example.com")).await.unwrap();
        assert_eq!(session.user_id, reg.user_id);
        assert_eq!(repo.current_session().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn duplicate_sign_up_conflicts() {
        let repo = InMemoryRepository::new();
        repo.sign_up(&creds("ana@example.com"), "Ana").await.unwrap();
        let err = repo.sign_up(&creds("ana@example.com"), "Ana").await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let repo = InMemoryRepository::new();
        repo.sign_up(&creds("ana@example.com"), "Ana").await.unwrap();
        let bad = Credentials::new("ana@example.com", "wrong-pass").unwrap();
        let err = repo.sign_in(&bad).await.unwrap_err();
        assert!(matches!(err, StorageError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn catalog_filters_and_orders() {
        let repo = InMemoryRepository::new();
        repo.upsert_content(item(1, ContentKind::Movie, 6.0)).unwrap();
        repo.upsert_content(item(2, ContentKind::Series, 9.0).featured()).unwrap();
        repo.upsert_content(item(3, ContentKind::Movie, 8.0).featured()).unwrap();

        let all = repo.list_content(ContentOrder::RatingDesc, None).await.unwrap();
        let ids: Vec<u64> = all.iter().map(|i| i.id.value()).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let movies = repo
            .list_content(ContentOrder::RatingDesc, Some(ContentKind::Movie))
            .await
            .unwrap();
        assert_eq!(movies.len(), 2);

        let featured = repo.featured_content(1).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, ContentId::new(2));

        assert!(repo.get_content(ContentId::new(4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn progress_upsert_replaces_row() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let content = ContentId::new(1);
        let first = ProgressRecord::new(user, content, Progress::new(10).unwrap(), fixed_now());
        let second = ProgressRecord::new(user, content, Progress::new(80).unwrap(), fixed_now());
        repo.upsert_progress(&first).await.unwrap();
        repo.upsert_progress(&second).await.unwrap();

        let rows = repo.list_progress(user).await.unwrap();
        assert_eq!(rows, vec![second]);
        assert!(repo.list_progress(UserId::random()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn favorites_add_remove() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let content = ContentId::new(5);

        repo.add_favorite(user, content, fixed_now()).await.unwrap();
        assert!(repo.is_favorite(user, content).await.unwrap());
        let err = repo.add_favorite(user, content, fixed_now()).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        repo.remove_favorite(user, content).await.unwrap();
        assert!(!repo.is_favorite(user, content).await.unwrap());
        repo.remove_favorite(user, content).await.unwrap();
    }

    #[tokio::test]
    async fn profile_insert_conflicts_on_second_insert() {
        let repo = InMemoryRepository::new();
        let profile =
            UserProfile::new(UserId::random(), "ana@example.com", "Ana", fixed_now()).unwrap();
        repo.insert_profile(&profile).await.unwrap();
        assert!(matches!(
            repo.insert_profile(&profile).await.unwrap_err(),
            StorageError::Conflict
        ));
        assert_eq!(repo.get_profile(profile.id).await.unwrap(), Some(profile));
    }
}
