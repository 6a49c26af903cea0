use std::sync::Arc;

use storage::repository::{AuthRepository, Registration, StorageError, UserRepository};
use stream_core::guard::SessionPresence;
use stream_core::model::{Credentials, Session, UserProfile};

use crate::Clock;
use crate::error::AuthError;

/// Account lifecycle: sign-up with profile creation, sign-in, sign-out and
/// session lookups.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    auth: Arc<dyn AuthRepository>,
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, auth: Arc<dyn AuthRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { clock, auth, users }
    }

    /// Create an account and its `users` profile row.
    ///
    /// A blank `name` falls back to the email's local part. The profile insert
    /// is best effort: an existing row is kept and other failures are logged
    /// without failing the sign-up, since the account already exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credentials` if the email or password is rejected
    /// locally, `AuthError::AlreadyRegistered` if the email is taken, and
    /// `AuthError::Storage` for other backend failures.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Registration, AuthError> {
        let credentials = Credentials::new(email, password)?;
        let name = profile_name(name, credentials.email());

        let registration = self
            .auth
            .sign_up(&credentials, &name)
            .await
            .map_err(AuthError::from_backend)?;

        let profile = UserProfile::new(
            registration.user_id,
            registration.email.clone(),
            name,
            self.clock.now(),
        )?;
        match self.users.insert_profile(&profile).await {
            Ok(()) => log::info!("created profile for {}", registration.user_id),
            Err(StorageError::Conflict) => {
                log::debug!("profile for {} already exists", registration.user_id);
            }
            Err(err) => {
                log::warn!("profile insert for {} failed: {err}", registration.user_id);
            }
        }

        Ok(registration)
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidLogin` when the backend rejects the
    /// credentials, `AuthError::Credentials` for locally invalid input.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = Credentials::new(email, password)?;
        let session = self
            .auth
            .sign_in(&credentials)
            .await
            .map_err(AuthError::from_backend)?;
        log::info!("signed in {}", session.user_id);
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend logout fails. The local
    /// session is dropped regardless.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be read.
    pub async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.auth.current_session().await?)
    }

    /// Session presence for routing. A failed check counts as signed out.
    pub async fn check_session(&self) -> SessionPresence {
        let result = self.auth.current_session().await;
        if let Err(err) = &result {
            log::warn!("session check failed, treating as signed out: {err}");
        }
        SessionPresence::from_check(result)
    }

    /// Profile row of the signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session or profile cannot be read.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        let Some(session) = self.auth.current_session().await? else {
            return Ok(None);
        };
        Ok(self.users.get_profile(session.user_id).await?)
    }
}

fn profile_name(name: &str, email: &str) -> String {
    let name = name.trim();
    if !name.is_empty() {
        return name.to_owned();
    }
    email.split('@').next().unwrap_or(email).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::{InMemoryRepository, UserRepository as _};
    use stream_core::model::CredentialsError;
    use stream_core::time::fixed_clock;

    fn service(repo: &InMemoryRepository) -> AuthService {
        AuthService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn sign_up_creates_profile_with_fallback_name() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);

        let reg = svc.sign_up("ana@example.com", "secret1", "  ").await.unwrap();
        let profile = repo.get_profile(reg.user_id).await.unwrap().unwrap();
        assert_eq!(profile.name, "ana");
        assert_eq!(profile.email, "ana@example.com");
        assert!(reg.session.is_some());
    }

    #[tokio::test]
    async fn sign_up_rejects_short_password_before_backend() {
        let repo = InMemoryRepository::new();
        let err = service(&repo)
            .sign_up("ana@example.com", "123", "Ana")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Credentials(CredentialsError::PasswordTooShort)
        ));
        assert!(service(&repo).current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_already_registered() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        svc.sign_up("ana@example.com", "secret1", "Ana").await.unwrap();
        let err = svc
            .sign_up("ANA@example.com", "secret1", "Ana")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn sign_in_and_out_drive_session_presence() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        svc.sign_up("ana@example.com", "secret1", "Ana").await.unwrap();
        svc.sign_out().await.unwrap();
        assert_eq!(svc.check_session().await, SessionPresence::Absent);

        let err = svc.sign_in("ana@example.com", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidLogin(_)));

        svc.sign_in("ana@example.com", "secret1").await.unwrap();
        assert_eq!(svc.check_session().await, SessionPresence::Present);
        let user = svc.current_user().await.unwrap().unwrap();
        assert_eq!(user.name, "Ana");
    }

    #[test]
    fn profile_name_prefers_trimmed_input() {
        assert_eq!(profile_name(" Ana ", "x@y.co"), "Ana");
        assert_eq!(profile_name("", "bruno@y.co"), "bruno");
    }
}
