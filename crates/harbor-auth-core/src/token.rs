//! Access and refresh token issuance and verification
//!
//! Both token classes are HS256 JWTs signed with distinct secrets. Access
//! tokens are stateless and verified by signature alone; refresh tokens
//! are additionally compared, in constant time, against the single stored
//! value on the account.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use subtle::ConstantTimeEq;

use harbor_db::AccountRow;
use harbor_types::AccountId;

use crate::{AuthConfig, AuthError};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Denormalized display fields
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl AccessClaims {
    /// Check if the claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Get the account ID from the subject claim
    pub fn account_id(&self) -> Option<AccountId> {
        AccountId::parse(&self.sub).ok()
    }
}

/// Claims carried by a refresh token (minimal by design)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Unique token ID. Guarantees each rotation produces a distinct
    /// token even within the same issuance second.
    pub jti: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl RefreshClaims {
    /// Get the account ID from the subject claim
    pub fn account_id(&self) -> Option<AccountId> {
        AccountId::parse(&self.sub).ok()
    }
}

/// Token issuer
///
/// Pure function of input + secret + current time; issuance has no side
/// effects. Persisting the refresh token is the coordinator's job.
#[derive(Clone)]
pub struct TokenIssuer {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the auth config
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Issue a short-lived access token for an account
    pub fn issue_access_token(&self, account: &AccountRow) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            iat: now,
            exp: now + self.access_ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_key).map_err(|e| {
            tracing::error!("Failed to sign access token: {}", e);
            AuthError::Internal("failed to sign access token".to_string())
        })
    }

    /// Issue a long-lived refresh token bound to an account identity
    pub fn issue_refresh_token(&self, account_id: AccountId) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = RefreshClaims {
            sub: account_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.refresh_ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_key).map_err(|e| {
            tracing::error!("Failed to sign refresh token: {}", e);
            AuthError::Internal("failed to sign refresh token".to_string())
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// Token verifier
#[derive(Clone)]
pub struct TokenVerifier {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier from the auth config
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry boundaries are exact; no clock-skew leeway.
        validation.leeway = 0;

        Self {
            access_key: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            validation,
        }
    }

    /// Validate an access token's signature and expiry
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let data = decode::<AccessClaims>(token, &self.access_key, &self.validation)
            .map_err(map_jwt_error)?;
        Ok(data.claims)
    }

    /// Validate a refresh token's signature and expiry only.
    ///
    /// The caller uses the subject claim to load the account, then calls
    /// [`verify_refresh`](Self::verify_refresh) with the stored value to
    /// complete the rotation check.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_key, &self.validation)
            .map_err(map_jwt_error)?;
        Ok(data.claims)
    }

    /// Full refresh-token check: signature/expiry first, then byte-for-byte
    /// equality with the account's stored token.
    ///
    /// A token that passes the signature check but does not match the
    /// stored value was rotated away or cleared by logout; that case is
    /// the distinct [`AuthError::TokenReused`] so telemetry can tell it
    /// apart from forgery.
    pub fn verify_refresh(
        &self,
        token: &str,
        stored: Option<&str>,
    ) -> Result<RefreshClaims, AuthError> {
        let claims = self.decode_refresh(token)?;

        let current = stored.ok_or(AuthError::TokenReused)?;
        let matches: bool = token.as_bytes().ct_eq(current.as_bytes()).into();
        if !matches {
            return Err(AuthError::TokenReused);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    tracing::debug!("Token validation failed: {}", err);
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    }
}
