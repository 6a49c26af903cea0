use std::collections::HashSet;
use std::sync::Arc;

use storage::repository::{
    AuthRepository, CatalogRepository, FavoriteRepository, ProgressRepository, UserRepository,
};
use stream_core::dashboard::Dashboard;
use stream_core::model::{ContentId, ContentItem, ContentOrder, Session, display_name};

use crate::error::DashboardError;

/// Everything the dashboard screen shows for one load.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub session: Session,
    pub user_name: String,
    /// Backdrop title; the best rated featured item when there is one.
    pub hero: Option<ContentItem>,
    pub dashboard: Dashboard,
    pub favorites: HashSet<ContentId>,
}

impl DashboardData {
    #[must_use]
    pub fn is_favorite(&self, id: ContentId) -> bool {
        self.favorites.contains(&id)
    }
}

/// Loads the dashboard snapshot for the signed-in user.
#[derive(Clone)]
pub struct DashboardService {
    auth: Arc<dyn AuthRepository>,
    users: Arc<dyn UserRepository>,
    catalog: Arc<dyn CatalogRepository>,
    progress: Arc<dyn ProgressRepository>,
    favorites: Arc<dyn FavoriteRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthRepository>,
        users: Arc<dyn UserRepository>,
        catalog: Arc<dyn CatalogRepository>,
        progress: Arc<dyn ProgressRepository>,
        favorites: Arc<dyn FavoriteRepository>,
    ) -> Self {
        Self {
            auth,
            users,
            catalog,
            progress,
            favorites,
        }
    }

    /// Resolve the session, then load the dashboard for it.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::NotSignedIn` without a session, and
    /// `DashboardError::Session` if the session cannot be read. See
    /// [`DashboardService::load_for`] for fetch failures.
    pub async fn load(&self) -> Result<DashboardData, DashboardError> {
        let session = self
            .auth
            .current_session()
            .await
            .map_err(DashboardError::Session)?
            .ok_or(DashboardError::NotSignedIn)?;
        self.load_for(session).await
    }

    /// Fetch catalog and progress concurrently, then aggregate.
    ///
    /// The hero, profile and favorites fetches run alongside; when one of
    /// them fails the screen still renders without it.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Content` or `DashboardError::Progress` naming
    /// the fetch that failed. Neither is replaced by an empty list.
    pub async fn load_for(&self, session: Session) -> Result<DashboardData, DashboardError> {
        let user = session.user_id;
        let (content, progress, featured, profile, favorites) = tokio::join!(
            self.catalog.list_content(ContentOrder::RatingDesc, None),
            self.progress.list_progress(user),
            self.catalog.featured_content(1),
            self.users.get_profile(user),
            self.favorites.list_favorites(user),
        );

        let content = content.map_err(DashboardError::Content)?;
        let progress = progress.map_err(DashboardError::Progress)?;

        let profile = profile.unwrap_or_else(|err| {
            log::warn!("profile fetch for {user} failed: {err}");
            None
        });
        let hero = match featured {
            Ok(items) => items.into_iter().next(),
            Err(err) => {
                log::warn!("featured fetch failed: {err}");
                None
            }
        };
        let favorites = match favorites {
            Ok(rows) => rows.into_iter().map(|f| f.content_id).collect(),
            Err(err) => {
                log::warn!("favorites fetch for {user} failed: {err}");
                HashSet::new()
            }
        };

        let dashboard = Dashboard::build(content, progress);
        let hero = hero.or_else(|| dashboard.featured().cloned());
        let user_name = display_name(profile.as_ref(), Some(&session.email));
        log::debug!(
            "dashboard for {user}: {} titles, {} in progress",
            dashboard.content().len(),
            dashboard.continue_watching().len()
        );

        Ok(DashboardData {
            session,
            user_name,
            hero,
            dashboard,
            favorites,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::{AuthRepository as _, InMemoryRepository, ProgressRepository as _};
    use stream_core::model::{ContentKind, Credentials, Progress, ProgressRecord};
    use stream_core::time::fixed_now;

    fn service(repo: &InMemoryRepository) -> DashboardService {
        DashboardService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    #[tokio::test]
    async fn load_requires_a_session() {
        let repo = InMemoryRepository::new();
        let err = service(&repo).load().await.unwrap_err();
        assert!(matches!(err, DashboardError::NotSignedIn));
    }

    #[tokio::test]
    async fn load_aggregates_and_names_user_from_email() {
        let repo = InMemoryRepository::new();
        for (id, category) in [(1, "Action"), (2, "Action"), (3, "Drama")] {
            let item = ContentItem::new(
                ContentId::new(id),
                format!("T{id}"),
                category,
                ContentKind::Movie,
                fixed_now(),
            );
            repo.upsert_content(item).unwrap();
        }
        let creds = Credentials::new("carla@example.com", "secret1").unwrap();
        let reg = repo.sign_up(&creds, "Carla").await.unwrap();
        repo.upsert_progress(&ProgressRecord::new(
            reg.user_id,
            ContentId::new(1),
            Progress::new(40).unwrap(),
            fixed_now(),
        ))
        .await
        .unwrap();

        let data = service(&repo).load().await.unwrap();
        // No profile row was inserted, so the name comes from the email.
        assert_eq!(data.user_name, "carla");
        assert_eq!(data.hero, None);
        let continuing: Vec<u64> = data
            .dashboard
            .continue_watching()
            .iter()
            .map(|c| c.id.value())
            .collect();
        assert_eq!(continuing, vec![1]);
        assert_eq!(
            data.dashboard.by_category().categories().collect::<Vec<_>>(),
            vec!["Action", "Drama"]
        );
    }
}
