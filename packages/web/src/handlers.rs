//! Handlers for `/api/auth/*`.

use axum::extract::{Extension, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, SubsecRound, Utc};
use dashboard_api::auth::Session;
use dashboard_api::{Avatar, Role};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Profile part of [`SessionView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<Avatar>,
}

/// Session as returned to the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: UserView,
    pub access_token: String,
    pub refresh_token: String,
    pub expires: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let identity = &session.identity;
        Self {
            user: UserView {
                id: identity.id.clone(),
                name: identity.name.clone(),
                email: identity.email.clone(),
                role: identity.role.clone(),
                avatar: identity.avatar.clone(),
            },
            access_token: identity.access_token.clone(),
            refresh_token: identity.refresh_token.clone(),
            expires: session.expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default, alias = "emailOrId")]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Exchange credentials with the backend and start a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Json<SessionView>), ApiError> {
    let identity = state
        .exchange
        .authenticate(&form.identifier, &form.password, form.remember_me)
        .await?;

    // Whole seconds, matching what a later verify of the same token reports.
    let issued_at = Utc::now().trunc_subsecs(0);
    let token = state.codec.mint_at(&identity, issued_at)?;
    let session = Session {
        identity,
        issued_at,
        expires_at: state.codec.expires_at(issued_at)?,
    };

    let jar = jar.add(state.cookie.session_cookie(token));
    Ok((jar, Json(SessionView::from(&session))))
}

/// Current session, or `null` when signed out.
pub async fn session(Extension(current): Extension<CurrentSession>) -> Json<Option<SessionView>> {
    Json(current.0.as_ref().map(SessionView::from))
}

/// Clear the session cookie and send the browser to the login page.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(session) = &current.0 {
        tracing::info!(user_id = %session.identity.id, "logout");
    }
    (
        state.cookie.clear(jar),
        Redirect::to(state.gate.login_path()),
    )
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default, alias = "email")]
    pub contact: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(form): Json<ForgotPasswordForm>,
) -> Result<Json<Notice>, ApiError> {
    state.recovery.request_reset(&form.contact).await?;
    Ok(Notice::new("Check your email for the 6-digit code"))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpForm {
    #[serde(default, alias = "email")]
    pub contact: String,
    #[serde(default)]
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(form): Json<VerifyOtpForm>,
) -> Result<Json<Notice>, ApiError> {
    state.recovery.verify_otp(&form.contact, &form.otp).await?;
    Ok(Notice::new("OTP verified successfully"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[serde(default, alias = "email")]
    pub contact: String,
    #[serde(default, alias = "newPassword")]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(form): Json<ResetPasswordForm>,
) -> Result<Json<Notice>, ApiError> {
    state
        .recovery
        .reset_password(&form.contact, &form.password, &form.confirm_password)
        .await?;
    Ok(Notice::new("Password reset successful"))
}
