//! # Identity model for authenticated actors
//!
//! An [`Identity`] is what the credential exchange produces and what the session
//! codec seals into the cookie. It carries the profile fields the dashboard shows
//! (name, email, avatar), the [`Role`] the route gate checks, and the two backend
//! credentials:
//!
//! - `access_token`: bearer credential the dashboard views attach to backend calls.
//! - `refresh_token`: carried end to end; nothing in this workspace exchanges it.
//!
//! [`Role`] keeps any string the backend sends. Only the roles listed in the gate
//! configuration grant dashboard access; everything else, including an empty role,
//! is treated as unauthorized.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role reported by the backend for an authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Vendor,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Vendor => "vendor",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Role::Admin,
            "vendor" => Role::Vendor,
            _ => Role::Other(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile picture reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    pub url: String,
}

/// Authenticated actor plus the backend credentials issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
    pub access_token: String,
    pub refresh_token: String,
}

impl Identity {
    /// Get display name, falling back to email if name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_ref().map(|a| a.url.as_str())
    }
}
