use stream_core::guard::{self, RouteDecision};

use crate::auth_service::AuthService;

/// Route guard wired to the live session.
#[derive(Clone)]
pub struct NavigationGuard {
    auth: AuthService,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    /// Check the session, then apply the routing rules to `path`.
    pub async fn evaluate(&self, path: &str) -> RouteDecision {
        let presence = self.auth.check_session().await;
        let decision = guard::evaluate(path, presence);
        if let Some(target) = decision.target() {
            log::debug!("redirecting {path} to {target}");
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use storage::repository::{
        AuthRepository, InMemoryRepository, Registration, StorageError,
    };
    use stream_core::model::{Credentials, Session};
    use stream_core::time::fixed_clock;

    use super::*;

    struct BrokenAuth;

    #[async_trait]
    impl AuthRepository for BrokenAuth {
        async fn sign_up(
            &self,
            _credentials: &Credentials,
            _name: &str,
        ) -> Result<Registration, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn sign_in(&self, _credentials: &Credentials) -> Result<Session, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn sign_out(&self) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn current_session(&self) -> Result<Option<Session>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    fn guard_over(auth: Arc<dyn AuthRepository>) -> NavigationGuard {
        let users = Arc::new(InMemoryRepository::new());
        NavigationGuard::new(AuthService::new(fixed_clock(), auth, users))
    }

    #[tokio::test]
    async fn failed_session_check_redirects_to_login() {
        let guard = guard_over(Arc::new(BrokenAuth));
        assert_eq!(guard.evaluate("/dashboard").await, RouteDecision::RedirectLogin);
        assert_eq!(guard.evaluate("/login").await, RouteDecision::Allow);
    }

    #[tokio::test]
    async fn signed_in_user_skips_login() {
        let repo = InMemoryRepository::new();
        let creds = Credentials::new("dana@example.com", "secret1").unwrap();
        repo.sign_up(&creds, "Dana").await.unwrap();

        let guard = guard_over(Arc::new(repo));
        assert_eq!(guard.evaluate("/login").await, RouteDecision::RedirectDashboard);
        assert_eq!(guard.evaluate("/dashboard").await, RouteDecision::Allow);
        assert_eq!(guard.evaluate("/").await, RouteDecision::Allow);
    }
}
