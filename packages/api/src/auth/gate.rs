//! # Route authorization gate
//!
//! A stateless decision function evaluated once per inbound request, before any
//! page code runs. Every path is classified as [`RouteClass::AuthFlow`],
//! [`RouteClass::Protected`] or [`RouteClass::Public`], then the first matching
//! rule wins:
//!
//! 1. auth-flow path with a session → redirect to the dashboard root;
//! 2. protected path without a session → redirect to the login page;
//! 3. protected path whose session role is not allowed → redirect to the login page;
//! 4. anything else → allow.
//!
//! Rules 2 and 3 share a redirect target so the client cannot tell a missing
//! session from an insufficient role. Paths outside every configured prefix are
//! always allowed.

use std::collections::HashSet;

use super::error::GateConfigError;
use crate::models::{Identity, Role};

/// Which part of the site a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    AuthFlow,
    Protected,
    Public,
}

/// Why a request was redirected. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    AlreadySignedIn,
    NoSession,
    RoleNotAllowed,
}

/// Outcome of one pass through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect { location: String, reason: DenyReason },
}

/// Path prefixes, redirect targets and the allowed-role set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub auth_prefixes: Vec<String>,
    pub protected_prefixes: Vec<String>,
    pub login_path: String,
    pub dashboard_root: String,
    pub allowed_roles: Vec<Role>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            auth_prefixes: vec!["/auth".into()],
            protected_prefixes: vec!["/dashboard".into()],
            login_path: "/auth/login".into(),
            dashboard_root: "/dashboard".into(),
            allowed_roles: vec![Role::Admin, Role::Vendor],
        }
    }
}

/// Validated gate, ready to evaluate requests.
#[derive(Debug, Clone)]
pub struct RouteGate {
    auth_prefixes: Vec<String>,
    protected_prefixes: Vec<String>,
    login_path: String,
    dashboard_root: String,
    allowed_roles: HashSet<Role>,
}

impl RouteGate {
    pub fn new(config: GateConfig) -> Result<Self, GateConfigError> {
        for prefix in config
            .auth_prefixes
            .iter()
            .chain(config.protected_prefixes.iter())
            .chain([&config.login_path, &config.dashboard_root])
        {
            if !prefix.starts_with('/') {
                return Err(GateConfigError::RelativePrefix(prefix.clone()));
            }
        }
        if config.allowed_roles.is_empty() {
            return Err(GateConfigError::NoAllowedRoles);
        }

        let gate = Self {
            auth_prefixes: config.auth_prefixes.iter().map(|p| trim_prefix(p)).collect(),
            protected_prefixes: config
                .protected_prefixes
                .iter()
                .map(|p| trim_prefix(p))
                .collect(),
            login_path: config.login_path,
            dashboard_root: config.dashboard_root,
            allowed_roles: config.allowed_roles.into_iter().collect(),
        };

        // Either of these would bounce a request between the two targets forever.
        if gate.classify(&gate.login_path) == RouteClass::Protected {
            return Err(GateConfigError::LoginPathProtected(gate.login_path));
        }
        if gate.classify(&gate.dashboard_root) == RouteClass::AuthFlow {
            return Err(GateConfigError::DashboardRootIsAuthFlow(gate.dashboard_root));
        }

        Ok(gate)
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn dashboard_root(&self) -> &str {
        &self.dashboard_root
    }

    pub fn is_allowed(&self, role: &Role) -> bool {
        self.allowed_roles.contains(role)
    }

    /// Classify a request path. Protected prefixes are checked first so an
    /// overlapping configuration fails closed.
    pub fn classify(&self, path: &str) -> RouteClass {
        let path = normalize_path(path);
        if self
            .protected_prefixes
            .iter()
            .any(|prefix| matches_prefix(&path, prefix))
        {
            RouteClass::Protected
        } else if self
            .auth_prefixes
            .iter()
            .any(|prefix| matches_prefix(&path, prefix))
        {
            RouteClass::AuthFlow
        } else {
            RouteClass::Public
        }
    }

    pub fn evaluate(&self, path: &str, session: Option<&Identity>) -> GateDecision {
        match (self.classify(path), session) {
            (RouteClass::AuthFlow, Some(_)) => {
                self.redirect(&self.dashboard_root, DenyReason::AlreadySignedIn)
            }
            (RouteClass::Protected, None) => self.redirect(&self.login_path, DenyReason::NoSession),
            (RouteClass::Protected, Some(identity)) if !self.is_allowed(&identity.role) => {
                self.redirect(&self.login_path, DenyReason::RoleNotAllowed)
            }
            _ => GateDecision::Allow,
        }
    }

    fn redirect(&self, location: &str, reason: DenyReason) -> GateDecision {
        GateDecision::Redirect {
            location: location.to_string(),
            reason,
        }
    }
}

fn trim_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `/dashboard` matches `/dashboard` and `/dashboard/x`, never `/dashboards`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Percent-decode, collapse empty and `.` segments, resolve `..`.
fn normalize_path(path: &str) -> String {
    let decoded = urlencoding::decode(path)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| path.to_string());

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}
