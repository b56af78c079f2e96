//! Route authorization middleware.
//!
//! Runs in front of every route, including the page fallback. The session cookie
//! is verified once here; the result travels to handlers as a [`CurrentSession`]
//! request extension.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use dashboard_api::auth::{GateDecision, Session};

use crate::state::AppState;

/// Verified session for the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

pub async fn route_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = jar.get(&state.cookie.name).map(|c| c.value().to_owned());
    let session = token.as_deref().and_then(|t| state.codec.open(t));
    let stale_cookie = token.is_some() && session.is_none();

    let path = request.uri().path().to_owned();
    let identity = session.as_ref().map(|s| &s.identity);

    match state.gate.evaluate(&path, identity) {
        GateDecision::Allow => {
            request.extensions_mut().insert(CurrentSession(session));
            next.run(request).await
        }
        GateDecision::Redirect { location, reason } => {
            tracing::debug!(%path, ?reason, %location, "gate redirect");
            let redirect = Redirect::temporary(&location);
            if stale_cookie {
                (state.cookie.clear(jar), redirect).into_response()
            } else {
                redirect.into_response()
            }
        }
    }
}
