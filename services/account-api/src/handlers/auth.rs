//! Session handlers (register, login, logout, refresh)

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};

use harbor_auth_core::{AuthError, LoginCredentials, NewAccount};
use harbor_types::{AccountProfile, TokenPair};

use crate::cookies::{expired_session_cookies, find_cookie, session_cookies, REFRESH_COOKIE};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::handlers::shared::{discard_staged, stage_upload};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: AccountProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/users/register
///
/// Multipart registration: text fields `fullName`, `email`, `username`,
/// `password`, a mandatory `avatar` file, and an optional `coverImage`
/// file. Both images are uploaded to the media host before the account
/// row is created, so a failed avatar upload leaves no partial account.
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut full_name = String::new();
    let mut email = String::new();
    let mut username = String::new();
    let mut password = String::new();
    let mut avatar_path = None;
    let mut cover_path = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("fullName") => full_name = field.text().await?,
            Some("email") => email = field.text().await?,
            Some("username") => username = field.text().await?,
            Some("password") => password = field.text().await?,
            Some("avatar") => avatar_path = Some(stage_upload(field).await?),
            Some("coverImage") => cover_path = Some(stage_upload(field).await?),
            _ => {}
        }
    }

    let Some(avatar_path) = avatar_path else {
        if let Some(path) = &cover_path {
            discard_staged(path).await;
        }
        return Err(ApiError::BadRequest("Avatar file is required".to_string()));
    };

    // The uploader consumes the staged file whether or not it succeeds
    let Some(avatar) = state.media.upload(&avatar_path).await else {
        if let Some(path) = &cover_path {
            discard_staged(path).await;
        }
        return Err(ApiError::UploadFailed("avatar"));
    };

    // Cover image is optional; a failed upload registers without one
    let cover_image_url = match cover_path {
        Some(path) => state.media.upload(&path).await.map(|m| m.url),
        None => None,
    };

    let profile = state
        .auth
        .register(NewAccount {
            full_name,
            email,
            username,
            password,
            avatar_url: avatar.url,
            cover_image_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/v1/users/login
///
/// Authenticate with username or email plus password. Issues a token
/// pair as HttpOnly cookies and in the response body.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state
        .auth
        .login(LoginCredentials {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookies = session_cookies(&outcome.tokens, &state.config.auth);

    Ok((
        StatusCode::OK,
        AppendHeaders(cookies),
        Json(LoginResponse {
            user: outcome.account,
            tokens: outcome.tokens,
        }),
    ))
}

/// POST /api/v1/users/logout
///
/// Clear the stored refresh token and expire both session cookies.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    state.auth.logout(auth_user.id()).await?;

    Ok((
        StatusCode::OK,
        AppendHeaders(expired_session_cookies()),
        Json(LogoutResponse { success: true }),
    ))
}

/// POST /api/v1/users/refresh-token
///
/// Exchange a refresh token (cookie or request body) for a new pair.
/// The stored token rotates, so the presented one is single-use.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> ApiResult<impl IntoResponse> {
    let from_cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| find_cookie(cookies, REFRESH_COOKIE))
        .filter(|v| !v.is_empty())
        .map(String::from);

    let presented = from_cookie
        .or_else(|| body.and_then(|Json(req)| req.refresh_token))
        .ok_or(AuthError::InvalidToken)?;

    let tokens = state.auth.refresh(&presented).await?;
    let cookies = session_cookies(&tokens, &state.config.auth);

    Ok((StatusCode::OK, AppendHeaders(cookies), Json(tokens)))
}
