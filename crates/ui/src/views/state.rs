use dioxus::prelude::*;
use services::DashboardError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    SignedOut,
    CatalogUnavailable,
    ProgressUnavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::SignedOut => "Your session has ended. Please sign in again.",
            Self::CatalogUnavailable => "We couldn't load the catalog right now.",
            Self::ProgressUnavailable => "We couldn't load your watch progress right now.",
        }
    }

    #[must_use]
    pub fn from_dashboard(err: &DashboardError) -> Self {
        match err {
            DashboardError::NotSignedIn => Self::SignedOut,
            DashboardError::Content(_) => Self::CatalogUnavailable,
            DashboardError::Progress(_) => Self::ProgressUnavailable,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
