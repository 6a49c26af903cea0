//! Shared error types for the services crate.

use thiserror::Error;

use storage::remote::BackendConfigError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use stream_core::model::{CredentialsError, ProgressError};

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("an account with this email already exists")]
    AlreadyRegistered,
    #[error("invalid login: {0}")]
    InvalidLogin(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Sort backend failures into the cases the login form distinguishes.
    pub(crate) fn from_backend(err: StorageError) -> Self {
        match err {
            StorageError::Conflict => Self::AlreadyRegistered,
            StorageError::Unauthorized(msg) => Self::InvalidLogin(msg),
            other => Self::Storage(other),
        }
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `FavoriteService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FavoriteServiceError {
    #[error("title is already in favorites")]
    AlreadyFavorite,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading the dashboard. Each variant names the fetch
/// that failed so the view can say what went wrong.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("could not check the session: {0}")]
    Session(#[source] StorageError),
    #[error("could not load the catalog: {0}")]
    Content(#[source] StorageError),
    #[error("could not load watch progress: {0}")]
    Progress(#[source] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Backend(#[from] BackendConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
