mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use tower::ServiceExt;

use common::*;

const UNREACHABLE: &str = "http://127.0.0.1:1";

fn cookie_for(state: &web::AppState, role: &str) -> String {
    let token = state.codec.mint(&identity(role)).unwrap();
    format!("{}={}", state.cookie.name, token)
}

#[tokio::test]
async fn auth_page_with_session_redirects_to_dashboard() {
    let state = state(UNREACHABLE);
    let cookie = cookie_for(&state, "admin");

    let response = router(state)
        .oneshot(get("/auth/login", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn dashboard_without_session_redirects_to_login() {
    let response = router(state(UNREACHABLE))
        .oneshot(get("/dashboard/projects", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/auth/login"));
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn dashboard_with_guest_role_redirects_to_login() {
    let state = state(UNREACHABLE);
    let cookie = cookie_for(&state, "guest");

    let response = router(state)
        .oneshot(get("/dashboard/clients", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn dashboard_with_admin_session_passes_through() {
    let state = state(UNREACHABLE);
    let cookie = cookie_for(&state, "admin");

    let response = router(state)
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "page /dashboard");
}

#[tokio::test]
async fn vendor_reaches_nested_dashboard_pages() {
    let state = state(UNREACHABLE);
    let cookie = cookie_for(&state, "vendor");

    let response = router(state)
        .oneshot(get("/dashboard/finance", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "page /dashboard/finance");
}

#[tokio::test]
async fn public_path_without_session_passes_through() {
    let response = router(state(UNREACHABLE))
        .oneshot(get("/public/anything", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "page /public/anything");
}

#[tokio::test]
async fn login_page_without_session_passes_through() {
    let response = router(state(UNREACHABLE))
        .oneshot(get("/auth/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn tampered_cookie_is_treated_as_no_session() {
    let state = state(UNREACHABLE);
    let mut cookie = cookie_for(&state, "admin");
    let last = cookie.pop().unwrap();
    cookie.push(if last == 'A' { 'B' } else { 'A' });

    let response = router(state)
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/auth/login"));
    let cleared = set_cookie(&response).unwrap();
    assert!(cleared.starts_with("session-token="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn tampered_cookie_does_not_block_auth_pages() {
    let response = router(state(UNREACHABLE))
        .oneshot(get("/auth/login", Some("session-token=garbage")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_cookie_is_treated_as_no_session() {
    let state = state(UNREACHABLE);
    let issued = Utc::now() - Duration::hours(24) - Duration::minutes(1);
    let token = state.codec.mint_at(&identity("admin"), issued).unwrap();
    let cookie = format!("session-token={token}");

    let response = router(state)
        .oneshot(get("/dashboard/tasks", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn cookie_signed_with_another_secret_is_rejected() {
    let other = dashboard_api::auth::SessionCodec::new(
        "some-other-deployment-secret-000000",
        Duration::hours(24),
    )
    .unwrap();
    let token = other.mint(&identity("admin")).unwrap();
    let cookie = format!("session-token={token}");

    let response = router(state(UNREACHABLE))
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn encoded_dashboard_path_is_still_gated() {
    let response = router(state(UNREACHABLE))
        .oneshot(get("/%64ashboard/clients", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/auth/login"));
}
