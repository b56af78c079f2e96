//! Shared application state handed to every handler and to the gate middleware.

use std::sync::Arc;

use anyhow::Context;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashboard_api::auth::{
    AuthBackend, CredentialExchange, HttpAuthBackend, PasswordRecovery, RouteGate, SessionCodec,
};

use crate::settings::Settings;

/// Attributes of the session cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub max_age_secs: i64,
}

impl CookieSettings {
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(self.max_age_secs))
            .build()
    }

    /// Expire the session cookie on the client.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(self.name.clone()).path("/"))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub exchange: CredentialExchange,
    pub recovery: PasswordRecovery,
    pub codec: Arc<SessionCodec>,
    pub gate: Arc<RouteGate>,
    pub cookie: Arc<CookieSettings>,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        codec: SessionCodec,
        gate: RouteGate,
        cookie: CookieSettings,
    ) -> Self {
        Self {
            exchange: CredentialExchange::new(backend.clone()),
            recovery: PasswordRecovery::new(backend),
            codec: Arc::new(codec),
            gate: Arc::new(gate),
            cookie: Arc::new(cookie),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let backend = HttpAuthBackend::new(&settings.backend.to_config())
            .context("Failed to create backend client")?;
        let codec = SessionCodec::new(
            &settings.session.secret,
            chrono::Duration::seconds(settings.session.max_age_secs),
        )
        .context("Invalid session settings")?;
        let gate = RouteGate::new(settings.gate.to_config()).context("Invalid gate settings")?;
        let cookie = CookieSettings {
            name: settings.session.cookie_name.clone(),
            secure: settings.session.secure_cookie,
            max_age_secs: settings.session.max_age_secs,
        };

        tracing::info!(
            backend = backend.base_url(),
            login = gate.login_path(),
            dashboard = gate.dashboard_root(),
            "auth core configured"
        );

        Ok(Self::new(Arc::new(backend), codec, gate, cookie))
    }
}
