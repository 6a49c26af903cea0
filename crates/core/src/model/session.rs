use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// Proof of authentication issued by the backend.
///
/// The token is opaque to the app; it is only forwarded on backend calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: UserId,
    pub email: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        user_id: UserId,
        email: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            user_id,
            email: email.into(),
            expires_at,
        }
    }

    /// A session without an expiry never expires locally.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
