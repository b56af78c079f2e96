//! Error types for the auth core.

use thiserror::Error;

/// Fallback shown when the backend rejects a login without a message.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Failures surfaced to the login and recovery forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Identifier or password was empty; no backend call was made.
    #[error("Identifier and password are required")]
    MissingCredentials,

    /// The backend declined the request.
    #[error("{0}")]
    Rejected(String),

    /// Transport or decoding failure while talking to the backend.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The backend answered with a success status but an unusable payload.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// Local validation of a recovery form failed.
    #[error("{0}")]
    InvalidInput(String),
}

/// Failures while minting a session token.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session secret is empty")]
    MissingSecret,

    #[error("failed to encode session payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to seal session payload: {0}")]
    Seal(String),

    #[error("session lifetime of {0}s is out of range")]
    LifetimeOutOfRange(i64),
}

/// Rejected gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateConfigError {
    #[error("path prefix {0:?} must start with '/'")]
    RelativePrefix(String),

    #[error("login path {0:?} is itself protected")]
    LoginPathProtected(String),

    #[error("dashboard root {0:?} is an auth-flow path")]
    DashboardRootIsAuthFlow(String),

    #[error("no roles are allowed on protected paths")]
    NoAllowedRoles,
}
