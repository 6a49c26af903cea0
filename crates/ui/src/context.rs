use std::sync::Arc;

use services::{AuthService, DashboardService, FavoriteService, NavigationGuard};

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn navigation(&self) -> Arc<NavigationGuard>;
    fn dashboard(&self) -> Arc<DashboardService>;
    fn favorites(&self) -> Arc<FavoriteService>;

    /// Shown under the login form, e.g. the demo account of a local backend.
    fn login_hint(&self) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    navigation: Arc<NavigationGuard>,
    dashboard: Arc<DashboardService>,
    favorites: Arc<FavoriteService>,
    login_hint: Option<String>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            navigation: app.navigation(),
            dashboard: app.dashboard(),
            favorites: app.favorites(),
            login_hint: app.login_hint(),
        }
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
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn favorites(&self) -> Arc<FavoriteService> {
        Arc::clone(&self.favorites)
    }

    #[must_use]
    pub fn login_hint(&self) -> Option<&str> {
        self.login_hint.as_deref()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
