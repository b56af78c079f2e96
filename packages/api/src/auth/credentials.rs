//! # Credential exchange
//!
//! Converts a submitted login form into an [`Identity`].
//!
//! 1. The identifier (email, client ID or employee ID; the backend decides which)
//!    is trimmed. An empty identifier or password fails with
//!    [`AuthError::MissingCredentials`] before any network call.
//! 2. One `POST /api/auth/login` with `{ emailOrId, password, rememberMe }`.
//!    `rememberMe` is forwarded as-is; it does not change the session lifetime.
//! 3. A non-success status becomes [`AuthError::Rejected`] carrying the backend's
//!    `message`, or `"Invalid credentials"` when there is none.
//! 4. A success body must match [`LoginResponse`]. Anything that is not JSON is an
//!    [`AuthError::AuthenticationFailed`]; JSON that misses required fields, or
//!    carries an empty id or token, is an [`AuthError::MalformedResponse`].
//!
//! No caching and no retries: two calls make two backend requests.

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::backend::{AuthBackend, BackendReply};
use super::error::{AuthError, INVALID_CREDENTIALS};
use crate::models::{Avatar, Identity, Role};

pub const LOGIN_PATH: &str = "/api/auth/login";

/// Avatar as the backend sends it: a bare URL or a `{ public_id, url }` object.
/// Any other shape is accepted and dropped; the avatar never fails a login.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AvatarPayload {
    Url(String),
    Object {
        #[serde(default)]
        public_id: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    Unusable(serde_json::Value),
}

impl AvatarPayload {
    fn into_avatar(self) -> Option<Avatar> {
        let (public_id, url) = match self {
            AvatarPayload::Url(url) => (None, url),
            AvatarPayload::Object {
                public_id,
                url: Some(url),
            } => (public_id.filter(|id| !id.trim().is_empty()), url),
            AvatarPayload::Object { url: None, .. } | AvatarPayload::Unusable(_) => return None,
        };
        if url.trim().is_empty() {
            return None;
        }
        Some(Avatar { public_id, url })
    }
}

/// Successful login payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    role: String,
    token: String,
    refresh_token: String,
    #[serde(default)]
    avatar: Option<AvatarPayload>,
}

impl LoginResponse {
    fn into_identity(self) -> Result<Identity, AuthError> {
        if self.id.trim().is_empty() {
            return Err(AuthError::MalformedResponse("empty _id".to_string()));
        }
        if self.token.trim().is_empty() {
            return Err(AuthError::MalformedResponse("empty token".to_string()));
        }

        Ok(Identity {
            id: self.id,
            name: self.name,
            email: self.email,
            role: Role::from(self.role),
            avatar: self.avatar.and_then(AvatarPayload::into_avatar),
            access_token: self.token,
            refresh_token: self.refresh_token,
        })
    }
}

/// Exchanges login credentials for an [`Identity`] through an [`AuthBackend`].
#[derive(Clone)]
pub struct CredentialExchange {
    backend: Arc<dyn AuthBackend>,
}

impl CredentialExchange {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    pub async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        remember: bool,
    ) -> Result<Identity, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let body = json!({
            "emailOrId": identifier,
            "password": secret,
            "rememberMe": remember,
        });
        let reply = self.backend.send(Method::POST, LOGIN_PATH, &body).await?;
        let identity = parse_login_reply(&reply)?;

        tracing::info!(user_id = %identity.id, role = %identity.role, "login accepted");
        Ok(identity)
    }
}

fn parse_login_reply(reply: &BackendReply) -> Result<Identity, AuthError> {
    if !reply.status.is_success() {
        let message = reply
            .message()
            .unwrap_or_else(|| INVALID_CREDENTIALS.to_string());
        tracing::info!(status = %reply.status, "login rejected by backend");
        return Err(AuthError::Rejected(message));
    }

    let value: serde_json::Value = serde_json::from_slice(&reply.body)
        .map_err(|e| AuthError::AuthenticationFailed(format!("invalid JSON: {}", e)))?;
    let response: LoginResponse = serde_json::from_value(value)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
    response.into_identity()
}
