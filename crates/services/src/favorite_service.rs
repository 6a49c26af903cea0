use std::sync::Arc;

use storage::repository::{FavoriteRepository, StorageError};
use stream_core::model::{ContentId, Favorite, UserId};

use crate::Clock;
use crate::error::FavoriteServiceError;

/// A user's saved titles ("My List").
#[derive(Clone)]
pub struct FavoriteService {
    clock: Clock,
    favorites: Arc<dyn FavoriteRepository>,
}

impl FavoriteService {
    #[must_use]
    pub fn new(clock: Clock, favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { clock, favorites }
    }

    /// Newest first.
    ///
    /// # Errors
    ///
    /// Returns `FavoriteServiceError::Storage` if the fetch fails.
    pub async fn list(&self, user: UserId) -> Result<Vec<Favorite>, FavoriteServiceError> {
        Ok(self.favorites.list_favorites(user).await?)
    }

    /// # Errors
    ///
    /// Returns `FavoriteServiceError::AlreadyFavorite` if the title is already saved.
    /// Returns `FavoriteServiceError::Storage` if the write fails.
    pub async fn add(
        &self,
        user: UserId,
        content: ContentId,
    ) -> Result<Favorite, FavoriteServiceError> {
        self.favorites
            .add_favorite(user, content, self.clock.now())
            .await
            .map_err(|err| match err {
                StorageError::Conflict => FavoriteServiceError::AlreadyFavorite,
                other => FavoriteServiceError::Storage(other),
            })
    }

    /// Removing a title that is not saved is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FavoriteServiceError::Storage` if the write fails.
    pub async fn remove(
        &self,
        user: UserId,
        content: ContentId,
    ) -> Result<(), FavoriteServiceError> {
        Ok(self.favorites.remove_favorite(user, content).await?)
    }

    /// # Errors
    ///
    /// Returns `FavoriteServiceError::Storage` if the lookup fails.
    pub async fn is_favorite(
        &self,
        user: UserId,
        content: ContentId,
    ) -> Result<bool, FavoriteServiceError> {
        Ok(self.favorites.is_favorite(user, content).await?)
    }

    /// Flip the saved state and return the new one.
    ///
    /// # Errors
    ///
    /// Returns `FavoriteServiceError::Storage` if the lookup or write fails.
    pub async fn toggle(
        &self,
        user: UserId,
        content: ContentId,
    ) -> Result<bool, FavoriteServiceError> {
        if self.is_favorite(user, content).await? {
            self.remove(user, content).await?;
            return Ok(false);
        }
        match self.add(user, content).await {
            // Saved concurrently between the check and the insert.
            Ok(_) | Err(FavoriteServiceError::AlreadyFavorite) => Ok(true),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use stream_core::time::fixed_clock;

    fn service() -> FavoriteService {
        FavoriteService::new(fixed_clock(), Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn toggle_flips_state() {
        let svc = service();
        let user = UserId::random();
        let id = ContentId::new(3);

        assert!(svc.toggle(user, id).await.unwrap());
        assert!(svc.is_favorite(user, id).await.unwrap());
        assert!(!svc.toggle(user, id).await.unwrap());
        assert!(svc.list(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn adding_twice_reports_already_favorite() {
        let svc = service();
        let user = UserId::random();
        let id = ContentId::new(3);

        svc.add(user, id).await.unwrap();
        let err = svc.add(user, id).await.unwrap_err();
        assert!(matches!(err, FavoriteServiceError::AlreadyFavorite));
        svc.remove(user, ContentId::new(99)).await.unwrap();
    }
}
