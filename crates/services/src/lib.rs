#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod catalog_service;
pub mod dashboard_service;
pub mod error;
pub mod favorite_service;
pub mod navigation;
pub mod progress_service;

pub use stream_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use catalog_service::{CatalogService, DEFAULT_FEATURED_LIMIT};
pub use dashboard_service::{DashboardData, DashboardService};
pub use error::{
    AppServicesError, AuthError, CatalogServiceError, DashboardError, FavoriteServiceError,
    ProgressServiceError,
};
pub use favorite_service::FavoriteService;
pub use navigation::NavigationGuard;
pub use progress_service::ProgressService;
