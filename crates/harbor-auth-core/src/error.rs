//! Auth errors

use thiserror::Error;

use crate::config::AuthConfigError;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing or empty request fields
    #[error("{0}")]
    Validation(String),

    /// Duplicate identity (username or email already taken)
    #[error("{0}")]
    Conflict(String),

    /// No such account
    #[error("account not found")]
    AccountNotFound,

    /// Invalid credentials (wrong password)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Invalid token (malformed, bad signature, etc.)
    #[error("invalid token")]
    InvalidToken,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Refresh token passed signature checks but is not the stored one;
    /// it was rotated away or cleared by logout. Kept distinct from
    /// forgery for logging, though the HTTP response is identical.
    #[error("refresh token is no longer current")]
    TokenReused,

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::AccountNotFound => 404,
            Self::InvalidCredentials
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::TokenReused => 401,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    ///
    /// Token verification sub-reasons collapse to a single code so the
    /// boundary never reveals whether a presented refresh token was
    /// expired, forged, or already rotated.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::AccountNotFound => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken | Self::TokenExpired | Self::TokenReused => "INVALID_TOKEN",
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<harbor_db::DbError> for AuthError {
    fn from(err: harbor_db::DbError) -> Self {
        match err {
            harbor_db::DbError::NotFound => Self::AccountNotFound,
            harbor_db::DbError::UniqueViolation => {
                Self::Conflict("username or email already in use".to_string())
            }
            harbor_db::DbError::Sqlx(e) => {
                tracing::error!("Database error: {}", e);
                Self::Database(e.to_string())
            }
        }
    }
}

impl From<AuthConfigError> for AuthError {
    fn from(err: AuthConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
