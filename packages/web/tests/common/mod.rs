#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, Uri};
use axum::Router;
use dashboard_api::{Identity, Role};
use web::{app, AppState, Settings};

pub const SECRET: &str = "integration-test-secret-0123456789";

pub fn settings(base_url: &str) -> Settings {
    Settings::from_toml(&format!(
        r#"
        [backend]
        base_url = "{base_url}"
        timeout_secs = 2

        [session]
        secret = "{SECRET}"
        "#
    ))
    .unwrap()
}

pub fn state(base_url: &str) -> AppState {
    AppState::from_settings(&settings(base_url)).unwrap()
}

/// Stand-in for the built front-end: echoes the path it was asked for.
pub fn pages() -> Router {
    Router::new().fallback(|uri: Uri| async move { format!("page {}", uri.path()) })
}

pub fn router(state: AppState) -> Router {
    app(state, pages())
}

pub fn identity(role: &str) -> Identity {
    Identity {
        id: "665f1c2e9a".into(),
        name: "Dana Ops".into(),
        email: "dana@example.com".into(),
        role: Role::from(role),
        avatar: None,
        access_token: "access-123".into(),
        refresh_token: "refresh-456".into(),
    }
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(path: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
