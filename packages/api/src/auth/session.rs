//! # Session tokens
//!
//! [`SessionCodec`] turns an [`Identity`] into the opaque cookie value and back.
//! The payload is JSON (`identity` fields plus `iat`/`exp` in unix seconds), sealed
//! with [`SealingKey`] and encoded as URL-safe base64 without padding.
//!
//! Verification never errors: a missing, malformed, tampered or expired token
//! simply yields `None`, which the route gate treats as "logged out".

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::error::SessionError;
use crate::crypto::SealingKey;
use crate::models::Identity;

/// Default absolute session lifetime, in seconds.
pub const DEFAULT_MAX_AGE_SECS: i64 = 24 * 60 * 60;

/// Longest accepted session lifetime (five years), in seconds.
pub const MAX_SESSION_AGE_SECS: i64 = 5 * 365 * DEFAULT_MAX_AGE_SECS;

/// A verified session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    identity: Identity,
    iat: i64,
    exp: i64,
}

/// Mints and verifies session tokens with a server-held secret.
#[derive(Debug, Clone)]
pub struct SessionCodec {
    key: SealingKey,
    max_age: Duration,
}

impl SessionCodec {
    pub fn new(secret: &str, max_age: Duration) -> Result<Self, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::MissingSecret);
        }
        if max_age <= Duration::zero() || max_age > Duration::seconds(MAX_SESSION_AGE_SECS) {
            return Err(SessionError::LifetimeOutOfRange(max_age.num_seconds()));
        }
        if secret.len() < 32 {
            tracing::warn!("session secret is shorter than 32 bytes");
        }
        Ok(Self {
            key: SealingKey::derive(secret),
            max_age,
        })
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Expiry of a session issued at `issued_at`.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Result<DateTime<Utc>, SessionError> {
        issued_at
            .checked_add_signed(self.max_age)
            .ok_or(SessionError::LifetimeOutOfRange(self.max_age.num_seconds()))
    }

    /// Seal `identity` into a token issued now.
    pub fn mint(&self, identity: &Identity) -> Result<String, SessionError> {
        self.mint_at(identity, Utc::now())
    }

    pub fn mint_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let claims = Claims {
            identity: identity.clone(),
            iat: issued_at.timestamp(),
            exp: self.expires_at(issued_at)?.timestamp(),
        };
        let payload = serde_json::to_vec(&claims)?;
        let sealed = self.key.seal(&payload).map_err(SessionError::Seal)?;
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Identity carried by a valid token.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        self.open(token).map(|session| session.identity)
    }

    pub fn open(&self, token: &str) -> Option<Session> {
        self.open_at(token, Utc::now())
    }

    pub fn open_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let sealed = URL_SAFE_NO_PAD.decode(token.trim()).ok()?;
        let payload = self.key.open(&sealed)?;
        let claims: Claims = serde_json::from_slice(&payload).ok()?;

        let issued_at = Utc.timestamp_opt(claims.iat, 0).single()?;
        let expires_at = Utc.timestamp_opt(claims.exp, 0).single()?;

        // Both bounds apply: exp from mint time, and max-age as configured now.
        if now > expires_at || now - issued_at > self.max_age {
            return None;
        }

        Some(Session {
            identity: claims.identity,
            issued_at,
            expires_at,
        })
    }
}
