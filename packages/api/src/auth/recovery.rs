//! Password recovery: request a code, verify it, set a new password.
//!
//! Each step validates its input locally, then forwards a single request to the
//! backend. Backend rejections keep the backend's `message` when present.

use std::sync::Arc;

use reqwest::Method;
use serde_json::json;

use super::backend::AuthBackend;
use super::error::AuthError;

pub const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
pub const VERIFY_OTP_PATH: &str = "/api/auth/verify-otp";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";

pub const OTP_LEN: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct PasswordRecovery {
    backend: Arc<dyn AuthBackend>,
}

impl PasswordRecovery {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    /// Ask the backend to send a one-time code to `contact`.
    pub async fn request_reset(&self, contact: &str) -> Result<(), AuthError> {
        let contact = require_contact(contact)?;
        self.forward(
            Method::POST,
            FORGOT_PASSWORD_PATH,
            json!({ "contact": contact }),
            "Failed to send reset email",
        )
        .await
    }

    pub async fn verify_otp(&self, contact: &str, otp: &str) -> Result<(), AuthError> {
        let contact = require_contact(contact)?;
        let otp = otp.trim();
        if otp.len() != OTP_LEN || !otp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthError::InvalidInput(
                "Please enter all 6 digits".to_string(),
            ));
        }
        self.forward(
            Method::POST,
            VERIFY_OTP_PATH,
            json!({ "contact": contact, "otp": otp }),
            "Invalid OTP. Please try again.",
        )
        .await
    }

    pub async fn reset_password(
        &self,
        contact: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), AuthError> {
        let contact = require_contact(contact)?;
        if password != confirm {
            return Err(AuthError::InvalidInput("Passwords do not match".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        self.forward(
            Method::PUT,
            RESET_PASSWORD_PATH,
            json!({ "email": contact, "newPassword": password, "confirmPassword": confirm }),
            "Failed to reset password",
        )
        .await
    }

    async fn forward(
        &self,
        method: Method,
        path: &str,
        body: serde_json::Value,
        fallback: &str,
    ) -> Result<(), AuthError> {
        let reply = self.backend.send(method, path, &body).await?;
        if reply.status.is_success() {
            Ok(())
        } else {
            tracing::info!(status = %reply.status, path, "recovery step rejected by backend");
            Err(AuthError::Rejected(
                reply.message().unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

fn require_contact(contact: &str) -> Result<&str, AuthError> {
    let contact = contact.trim();
    if contact.is_empty() {
        Err(AuthError::InvalidInput("Email is required".to_string()))
    } else {
        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::backend::{BackendConfig, HttpAuthBackend};
    use mockito::Matcher;

    async fn recovery_for(server: &mockito::ServerGuard) -> PasswordRecovery {
        let backend = HttpAuthBackend::new(&BackendConfig::new(server.url())).unwrap();
        PasswordRecovery::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn test_request_reset_forwards_contact() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", FORGOT_PASSWORD_PATH)
            .match_body(Matcher::Json(json!({"contact": "dana@example.com"})))
            .with_status(200)
            .create_async()
            .await;

        recovery_for(&server)
            .await
            .request_reset(" dana@example.com ")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_local_validation_skips_backend() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;
        let recovery = recovery_for(&server).await;

        assert!(matches!(
            recovery.request_reset("  ").await,
            Err(AuthError::InvalidInput(_))
        ));
        for otp in ["12345", "1234567", "12a456", ""] {
            assert!(matches!(
                recovery.verify_otp("dana@example.com", otp).await,
                Err(AuthError::InvalidInput(_))
            ));
        }
        assert_eq!(
            recovery
                .reset_password("dana@example.com", "longenough1", "longenough2")
                .await,
            Err(AuthError::InvalidInput("Passwords do not match".into()))
        );
        assert_eq!(
            recovery.reset_password("dana@example.com", "short", "short").await,
            Err(AuthError::InvalidInput(
                "Password must be at least 8 characters".into()
            ))
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_verify_otp_rejection_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", VERIFY_OTP_PATH)
            .match_body(Matcher::Json(json!({"contact": "dana@example.com", "otp": "123456"})))
            .with_status(400)
            .create_async()
            .await;

        let err = recovery_for(&server)
            .await
            .verify_otp("dana@example.com", "123456")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Rejected("Invalid OTP. Please try again.".into()));
    }

    #[tokio::test]
    async fn test_reset_password_uses_put() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", RESET_PASSWORD_PATH)
            .match_body(Matcher::Json(json!({
                "email": "dana@example.com",
                "newPassword": "n3w-passw0rd",
                "confirmPassword": "n3w-passw0rd"
            })))
            .with_status(200)
            .create_async()
            .await;

        recovery_for(&server)
            .await
            .reset_password("dana@example.com", "n3w-passw0rd", "n3w-passw0rd")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reset_password_keeps_backend_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", RESET_PASSWORD_PATH)
            .with_status(410)
            .with_body(r#"{"message":"Reset window expired"}"#)
            .create_async()
            .await;

        let err = recovery_for(&server)
            .await
            .reset_password("dana@example.com", "n3w-passw0rd", "n3w-passw0rd")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Rejected("Reset window expired".into()));
    }
}
