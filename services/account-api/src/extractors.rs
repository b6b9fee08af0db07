//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use harbor_types::{AccountId, AccountProfile};

use crate::cookies::{find_cookie, ACCESS_COOKIE};
use crate::state::AppState;

/// Authenticated account extracted from the request.
///
/// Carries the sanitized profile loaded while verifying the access
/// token, so handlers never re-fetch the account just to identify it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account: AccountProfile,
}

impl AuthUser {
    pub fn id(&self) -> AccountId {
        self.account.id
    }
}

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let app_state = AppState::from_ref(state);

            // Try to extract token from cookie or Authorization header
            let token = extract_token(parts)?;

            // Verify the token and load the account it names
            let account = app_state.auth.authenticate(&token).await.map_err(|e| {
                tracing::debug!(error = ?e, "Access token verification failed");
                AuthRejection {
                    status: StatusCode::UNAUTHORIZED,
                    code: "INVALID_TOKEN",
                    message: "Invalid or expired token",
                }
            })?;

            Ok(AuthUser { account })
        })
    }
}

/// Extract the access token from the session cookie or Authorization header
fn extract_token(parts: &Parts) -> Result<String, AuthRejection> {
    // Try the access token cookie first
    if let Some(cookie_header) = parts.headers.get(header::COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|_| AuthRejection {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_HEADER",
            message: "Invalid Cookie header encoding",
        })?;

        if let Some(value) = find_cookie(cookie_str, ACCESS_COOKIE) {
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }
    }

    // Fall back to the Authorization header (Bearer token)
    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| AuthRejection {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_HEADER",
            message: "Invalid Authorization header encoding",
        })?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.to_string());
        }
    }

    Err(AuthRejection {
        status: StatusCode::UNAUTHORIZED,
        code: "MISSING_TOKEN",
        message: "No authentication token provided",
    })
}
