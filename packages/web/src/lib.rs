//! HTTP front for the dashboard: the route gate, the auth API and the page fallback.

use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod settings;
pub mod state;

pub use settings::Settings;
pub use state::{AppState, CookieSettings};

/// Build the application router.
///
/// `pages` serves everything outside `/api/auth` (normally the built front-end).
/// The gate wraps both, so no page is reached before the session is checked.
pub fn app(state: AppState, pages: Router) -> Router {
    let auth = Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/session", get(handlers::session))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/verify-otp", post(handlers::verify_otp))
        .route("/reset-password", post(handlers::reset_password));

    Router::new()
        .nest("/api/auth", auth)
        .fallback_service(pages)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::route_gate,
        ))
        .with_state(state)
}
