//! HTTP mapping of auth-core errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashboard_api::auth::{AuthError, SessionError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Auth(err @ AuthError::MissingCredentials) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Auth(AuthError::InvalidInput(message)) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            ApiError::Auth(AuthError::Rejected(message)) => {
                (StatusCode::UNAUTHORIZED, message.clone())
            }
            ApiError::Auth(
                AuthError::AuthenticationFailed(_) | AuthError::MalformedResponse(_),
            ) => (
                StatusCode::BAD_GATEWAY,
                "Authentication failed. Please try again.".to_string(),
            ),
            ApiError::Session(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not start session".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "message": message }))).into_response()
    }
}
