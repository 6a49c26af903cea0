use std::sync::Arc;

use storage::remote::BackendConfig;
use storage::repository::{InMemoryRepository, Storage};
use storage::seed;
use storage::sqlite::SqliteRepository;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::catalog_service::CatalogService;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::favorite_service::FavoriteService;
use crate::navigation::NavigationGuard;
use crate::progress_service::ProgressService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    auth: Arc<AuthService>,
    navigation: Arc<NavigationGuard>,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    favorites: Arc<FavoriteService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let auth = AuthService::new(
            clock,
            Arc::clone(&storage.auth),
            Arc::clone(&storage.users),
        );
        let navigation = Arc::new(NavigationGuard::new(auth.clone()));
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.catalog)));
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let favorites = Arc::new(FavoriteService::new(clock, Arc::clone(&storage.favorites)));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&storage.auth),
            Arc::clone(&storage.users),
            Arc::clone(&storage.catalog),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.favorites),
        ));

        Self {
            auth: Arc::new(auth),
            navigation,
            catalog,
            progress,
            favorites,
            dashboard,
        }
    }

    /// Build services backed by the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Backend` if the HTTP client cannot be built.
    pub fn new_hosted(config: BackendConfig, clock: Clock) -> Result<Self, AppServicesError> {
        log::info!("using hosted backend at {}", config.base_url);
        let storage = Storage::hosted(config)?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services backed by `SQLite`, with the demo catalog and demo
    /// viewer in place.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or seeding fails.
    pub async fn new_local(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        log::info!("using local backend at {db_url}");
        let repo = SqliteRepository::connect(db_url).await?;
        let accounts = InMemoryRepository::new();
        let storage = Storage::local(repo.clone(), accounts.clone()).await?;
        seed::seed_local(&repo, &accounts, clock.now()).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn navigation(&self) -> Arc<NavigationGuard> {
        Arc::clone(&self.navigation)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn favorites(&self) -> Arc<FavoriteService> {
        Arc::clone(&self.favorites)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}
