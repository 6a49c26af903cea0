mod dashboard;
mod footer;
mod landing;
mod login;
mod not_found;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use footer::SiteFooter;
pub use landing::LandingView;
pub use login::LoginView;
pub use not_found::NotFoundView;
pub use state::{ViewError, ViewState, view_state_from_resource};
