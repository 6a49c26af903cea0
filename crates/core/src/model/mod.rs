mod content;
mod ids;
mod progress;
mod session;
mod user;

pub use content::{ContentItem, ContentKind, ContentKindError, ContentOrder, sort_content};
pub use ids::{ContentId, FavoriteId, ParseIdError, UserId};
pub use progress::{Progress, ProgressError, ProgressRecord};
pub use session::Session;
pub use user::{
    Credentials, CredentialsError, FALLBACK_DISPLAY_NAME, Favorite, MIN_PASSWORD_LEN,
    UserProfile, display_name,
};
