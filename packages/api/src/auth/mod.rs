//! Authentication core: credential exchange, session tokens, route gate, recovery.

mod backend;
mod credentials;
mod error;
mod gate;
mod recovery;
mod session;

pub use backend::{AuthBackend, BackendConfig, BackendReply, HttpAuthBackend, DEFAULT_TIMEOUT};
pub use credentials::{CredentialExchange, LOGIN_PATH};
pub use error::{AuthError, GateConfigError, SessionError, INVALID_CREDENTIALS};
pub use gate::{DenyReason, GateConfig, GateDecision, RouteClass, RouteGate};
pub use recovery::PasswordRecovery;
pub use session::{Session, SessionCodec, DEFAULT_MAX_AGE_SECS, MAX_SESSION_AGE_SECS};
