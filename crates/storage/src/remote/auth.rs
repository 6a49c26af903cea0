use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use stream_core::model::{Credentials, Session, UserId};

use super::{HostedBackend, decode_error};
use crate::repository::{AuthRepository, Registration, StorageError};

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

/// Token response. Sign-up answers with a bare user object instead when the
/// account still needs email confirmation.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    user: Option<WireUser>,
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default)]
    email: Option<String>,
}

impl AuthResponse {
    fn user(&self) -> Option<(UserId, Option<&str>)> {
        if let Some(user) = &self.user {
            return Some((user.id, user.email.as_deref()));
        }
        self.id.map(|id| (id, self.email.as_deref()))
    }

    fn expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(at) = self.expires_at.and_then(|s| DateTime::from_timestamp(s, 0)) {
            return Some(at);
        }
        self.expires_in.map(|secs| now + Duration::seconds(secs))
    }

    fn into_registration(
        self,
        fallback_email: &str,
        now: DateTime<Utc>,
    ) -> Result<Registration, StorageError> {
        let (user_id, email) = self
            .user()
            .ok_or_else(|| StorageError::Serialization("auth response has no user".into()))?;
        let email = email.unwrap_or(fallback_email).to_owned();
        let expires_at = self.expiry(now);
        let session = self
            .access_token
            .map(|token| Session::new(token, user_id, email.clone(), expires_at));
        Ok(Registration {
            user_id,
            email,
            session,
        })
    }
}

impl HostedBackend {
    async fn auth_call<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthResponse, StorageError> {
        let url = self.endpoint(path)?;
        let response = Self::send(self.request(Method::POST, url)?.json(body)).await?;
        response.json().await.map_err(decode_error)
    }
}

#[async_trait]
impl AuthRepository for HostedBackend {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        name: &str,
    ) -> Result<Registration, StorageError> {
        let body = SignUpBody {
            email: credentials.email(),
            password: credentials.password(),
            data: SignUpMetadata { name },
        };
        let registration = self
            .auth_call("auth/v1/signup", &body)
            .await?
            .into_registration(credentials.email(), Utc::now())?;

        if registration.session.is_some() {
            self.store_session(registration.session.clone())?;
        } else {
            log::info!("sign-up for {} awaits email confirmation", registration.email);
        }
        Ok(registration)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, StorageError> {
        let body = PasswordGrant {
            email: credentials.email(),
            password: credentials.password(),
        };
        let session = self
            .auth_call("auth/v1/token?grant_type=password", &body)
            .await?
            .into_registration(credentials.email(), Utc::now())?
            .session
            .ok_or_else(|| StorageError::Serialization("token response has no access token".into()))?;

        self.store_session(Some(session.clone()))?;
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        if self.stored_session()?.is_none() {
            return Ok(());
        }
        let url = self.endpoint("auth/v1/logout")?;
        let result = Self::send(self.request(Method::POST, url)?).await;
        // The local session is dropped even if the backend call fails.
        self.store_session(None)?;
        match result {
            Ok(_) | Err(StorageError::Unauthorized(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn current_session(&self) -> Result<Option<Session>, StorageError> {
        let Some(session) = self.stored_session()? else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            log::debug!("stored session expired; clearing it");
            self.store_session(None)?;
            return Ok(None);
        }
        Ok(Some(session))
    }
}
