use std::fmt;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use dashboard_api::auth::{BackendConfig, GateConfig, DEFAULT_MAX_AGE_SECS, MAX_SESSION_AGE_SECS};
use dashboard_api::Role;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Backend {
    pub fn to_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct Session {
    pub secret: String,
    pub max_age_secs: i64,
    pub cookie_name: String,
    pub secure_cookie: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("secret", &"<redacted>")
            .field("max_age_secs", &self.max_age_secs)
            .field("cookie_name", &self.cookie_name)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gate {
    pub auth_prefixes: Vec<String>,
    pub protected_prefixes: Vec<String>,
    pub login_path: String,
    pub dashboard_root: String,
    pub allowed_roles: Vec<String>,
}

impl Gate {
    pub fn to_config(&self) -> GateConfig {
        GateConfig {
            auth_prefixes: self.auth_prefixes.clone(),
            protected_prefixes: self.protected_prefixes.clone(),
            login_path: self.login_path.clone(),
            dashboard_root: self.dashboard_root.clone(),
            allowed_roles: self
                .allowed_roles
                .iter()
                .map(|r| Role::from(r.trim()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub backend: Backend,
    pub session: Session,
    pub gate: Gate,
    pub web: Web,
}

impl Settings {
    /// Defaults, then `config.toml` if present, then `APP_*` environment variables
    /// (`APP_BACKEND__BASE_URL`, `APP_SESSION__SECRET`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("gate.auth_prefixes")
                    .with_list_parse_key("gate.protected_prefixes")
                    .with_list_parse_key("gate.allowed_roles"),
            )
            .build()?;

        Self::finish(config)
    }

    /// Defaults overlaid with an inline TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Self::finish(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.addr", "127.0.0.1:3000")?
            .set_default("backend.timeout_secs", 15)?
            .set_default("session.max_age_secs", DEFAULT_MAX_AGE_SECS)?
            .set_default("session.cookie_name", "session-token")?
            .set_default("session.secure_cookie", false)?
            .set_default("gate.auth_prefixes", vec!["/auth"])?
            .set_default("gate.protected_prefixes", vec!["/dashboard"])?
            .set_default("gate.login_path", "/auth/login")?
            .set_default("gate.dashboard_root", "/dashboard")?
            .set_default("gate.allowed_roles", vec!["admin", "vendor"])?
            .set_default("web.static_dir", "dist")
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        // backend.base_url and session.secret have no default: deserializing fails without them.
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Message("backend.base_url must not be empty".into()));
        }
        if self.session.secret.is_empty() {
            return Err(ConfigError::Message("session.secret must not be empty".into()));
        }
        if self.session.max_age_secs <= 0 {
            return Err(ConfigError::Message("session.max_age_secs must be positive".into()));
        }
        if self.session.max_age_secs > MAX_SESSION_AGE_SECS {
            return Err(ConfigError::Message(format!(
                "session.max_age_secs must not exceed {MAX_SESSION_AGE_SECS}"
            )));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::Message("session.cookie_name must not be empty".into()));
        }
        Ok(())
    }
}
