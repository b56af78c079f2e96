//! Transport to the REST backend.
//!
//! [`AuthBackend`] is the seam between the auth core and the network: it sends one
//! JSON request and hands back the raw status and body. Interpreting the reply
//! (rejection messages, payload schema) is left to the callers so it can be tested
//! without a server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use super::error::AuthError;

/// Default per-request timeout for backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Raw backend reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl BackendReply {
    /// Human-readable `message` field of an error body, if any.
    pub fn message(&self) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Send `body` as JSON to `path` (relative to the backend base URL).
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<BackendReply, AuthError>;
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// reqwest-backed [`AuthBackend`]. One shot per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    client: Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, AuthError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AuthError::AuthenticationFailed(
                "backend base URL is not configured".to_string(),
            ));
        }

        let client = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::AuthenticationFailed(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<BackendReply, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "backend request");

        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("backend request to {} failed: {}", url, e);
                AuthError::AuthenticationFailed(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::AuthenticationFailed(e.to_string()))?
            .to_vec();

        tracing::debug!(%status, "backend reply");
        Ok(BackendReply { status, body })
    }
}
