//! Adapter for the hosted backend: a token auth service under `/auth/v1` and a
//! PostgREST data API under `/rest/v1`.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use stream_core::model::Session;
use thiserror::Error;
use url::Url;

use crate::repository::{Storage, StorageError};

mod auth;
mod query;
mod tables;

pub use query::RestQuery;

pub const APPLICATION_NAME: &str = "cinestream";
const APPLICATION_HEADER: &str = "x-application-name";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendConfigError {
    #[error("backend url is not valid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("backend url must use http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("anon key is not a valid header value")]
    InvalidAnonKey,
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: Url,
    pub anon_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `BackendConfigError` if `base_url` does not parse or is not http(s).
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, BackendConfigError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(BackendConfigError::UnsupportedScheme(
                base_url.scheme().to_owned(),
            ));
        }
        // `Url::join` drops the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            log::warn!("anon key is not configured; backend requests will likely be rejected");
        }

        Ok(Self {
            base_url,
            anon_key,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        })
    }

    #[must_use]
    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }
}

/// Hosted backend client. Clones share the HTTP pool and the current session.
#[derive(Clone)]
pub struct HostedBackend {
    client: Client,
    config: Arc<BackendConfig>,
    session: Arc<RwLock<Option<Session>>>,
}

impl HostedBackend {
    /// # Errors
    ///
    /// Returns `BackendConfigError` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(APPLICATION_HEADER),
            HeaderValue::from_static(APPLICATION_NAME),
        );
        headers.insert(
            HeaderName::from_static("apikey"),
            HeaderValue::from_str(&config.anon_key)
                .map_err(|_| BackendConfigError::InvalidAnonKey)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
        })
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// `/rest/v1/<table>` with the query's parameters.
    pub(crate) fn rest_url(&self, table: &str, query: &RestQuery) -> Result<Url, StorageError> {
        let mut url = self.endpoint(&format!("rest/v1/{table}"))?;
        query.apply(&mut url);
        Ok(url)
    }

    pub(crate) fn stored_session(&self) -> Result<Option<Session>, StorageError> {
        self.session
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    pub(crate) fn store_session(&self, session: Option<Session>) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = session;
        Ok(())
    }

    /// Session token when signed in, the anon key otherwise.
    pub(crate) fn bearer(&self) -> Result<String, StorageError> {
        Ok(self
            .stored_session()?
            .map_or_else(|| self.config.anon_key.clone(), |s| s.access_token))
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, StorageError> {
        Ok(self.client.request(method, url).bearer_auth(self.bearer()?))
    }

    pub(crate) async fn send(builder: RequestBuilder) -> Result<Response, StorageError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::debug!("backend responded {status}: {body}");
        Err(status_error(status, &body))
    }

    pub(crate) async fn fetch_rows<T: for<'de> Deserialize<'de>>(
        &self,
        table: &str,
        query: &RestQuery,
    ) -> Result<Vec<T>, StorageError> {
        let url = self.rest_url(table, query)?;
        let response = Self::send(self.request(Method::GET, url)?).await?;
        response.json().await.map_err(decode_error)
    }
}

impl Storage {
    /// Every contract served by one hosted backend client.
    ///
    /// # Errors
    ///
    /// Returns `BackendConfigError` if the HTTP client cannot be built.
    pub fn hosted(config: BackendConfig) -> Result<Self, BackendConfigError> {
        let backend = HostedBackend::new(config)?;
        Ok(Self {
            auth: Arc::new(backend.clone()),
            catalog: Arc::new(backend.clone()),
            progress: Arc::new(backend.clone()),
            favorites: Arc::new(backend.clone()),
            users: Arc::new(backend),
        })
    }
}

/// Error body shapes of both the auth service and PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

const UNIQUE_VIOLATION: &str = "23505";

pub(crate) fn status_error(status: StatusCode, body: &str) -> StorageError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .unwrap_or_else(|| status.to_string());
    let unique_violation = parsed
        .code
        .as_ref()
        .is_some_and(|code| code.as_str() == Some(UNIQUE_VIOLATION));

    if unique_violation || status == StatusCode::CONFLICT {
        return StorageError::Conflict;
    }
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            if is_auth_message(&message) || status != StatusCode::BAD_REQUEST =>
        {
            StorageError::Unauthorized(message)
        }
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY if message.contains("already registered") => {
            StorageError::Conflict
        }
        _ => StorageError::Connection(format!("HTTP {}: {message}", status.as_u16())),
    }
}

fn is_auth_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("credentials") || lower.contains("jwt") || lower.contains("token")
}

fn transport_error(e: reqwest::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn decode_error(e: reqwest::Error) -> StorageError {
    StorageError::Serialization(e.to_string())
}
