use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ContentId, FavoriteId, UserId};

//
// ─── CREDENTIALS ───────────────────────────────────────────────────────────────
//

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("name cannot be empty")]
    EmptyName,
}

/// Email/password pair checked before it is sent to the auth backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `CredentialsError` if the email has no `local@domain` shape or
    /// the password is shorter than `MIN_PASSWORD_LEN`.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let email = email.into().trim().to_owned();
        let password = password.into();

        if !is_plausible_email(&email) {
            return Err(CredentialsError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort);
        }

        Ok(Self { email, password })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

/// Row in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// # Errors
    ///
    /// Returns `CredentialsError::EmptyName` if `name` is blank.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CredentialsError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(CredentialsError::EmptyName);
        }
        Ok(Self {
            id,
            email: email.into(),
            name,
            created_at,
        })
    }
}

pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// Greeting name: profile name, else the email's local part, else a fixed fallback.
#[must_use]
pub fn display_name(profile: Option<&UserProfile>, email: Option<&str>) -> String {
    if let Some(name) = profile.map(|p| p.name.trim()).filter(|n| !n.is_empty()) {
        return name.to_owned();
    }
    email
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
        .map_or_else(|| FALLBACK_DISPLAY_NAME.to_owned(), ToOwned::to_owned)
}

//
// ─── FAVORITES ─────────────────────────────────────────────────────────────────
//

/// Row in the `user_favorites` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub content_id: ContentId,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn credentials_validate_email_shape() {
        assert!(Credentials::new("ana@example.com", "secret1").is_ok());
        for bad in ["", "ana", "@example.com", "ana@", "ana@example", "ana@.com"] {
            assert_eq!(
                Credentials::new(bad, "secret1").unwrap_err(),
                CredentialsError::InvalidEmail,
                "{bad}"
            );
        }
    }

    #[test]
    fn credentials_require_min_password() {
        assert_eq!(
            Credentials::new("ana@example.com", "12345").unwrap_err(),
            CredentialsError::PasswordTooShort
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("ana@example.com", "hunter22").unwrap();
        assert!(!format!("{creds:?}").contains("hunter22"));
    }

    #[test]
    fn display_name_prefers_profile_then_email() {
        let profile = UserProfile::new(UserId::random(), "ana@example.com", "Ana", fixed_now()).unwrap();
        assert_eq!(display_name(Some(&profile), Some("x@y.z")), "Ana");
        assert_eq!(display_name(None, Some("bruno@example.com")), "bruno");
        assert_eq!(display_name(None, None), FALLBACK_DISPLAY_NAME);
    }

    #[test]
    fn profile_rejects_blank_name() {
        let err = UserProfile::new(UserId::random(), "a@b.c", "   ", fixed_now()).unwrap_err();
        assert_eq!(err, CredentialsError::EmptyName);
    }
}
