//! Configuration types for the auth service

use std::time::Duration;

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signing secret for access tokens
    pub access_token_secret: String,
    /// Signing secret for refresh tokens (must differ from the access secret)
    pub refresh_token_secret: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Minimum allowed secret length in bytes (256 bits)
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Default access token lifetime (15 minutes)
    pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

    /// Default refresh token lifetime (10 days)
    pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(10 * 24 * 60 * 60);

    /// Create a new auth config, validating both secrets.
    ///
    /// The two token classes use separate secrets so that compromise of
    /// one cannot forge the other; equal secrets are rejected.
    pub fn try_new(
        access_token_secret: impl Into<String>,
        refresh_token_secret: impl Into<String>,
    ) -> Result<Self, AuthConfigError> {
        let access_token_secret = access_token_secret.into();
        let refresh_token_secret = refresh_token_secret.into();

        for (name, secret) in [
            ("access token secret", &access_token_secret),
            ("refresh token secret", &refresh_token_secret),
        ] {
            if secret.len() < Self::MIN_SECRET_LENGTH {
                return Err(AuthConfigError::SecretTooShort {
                    which: name,
                    actual: secret.len(),
                    minimum: Self::MIN_SECRET_LENGTH,
                });
            }
        }

        if access_token_secret == refresh_token_secret {
            return Err(AuthConfigError::SecretsNotDistinct);
        }

        Ok(Self {
            access_token_secret,
            refresh_token_secret,
            access_token_ttl: Self::DEFAULT_ACCESS_TTL,
            refresh_token_ttl: Self::DEFAULT_REFRESH_TTL,
        })
    }

    /// Set the access token lifetime
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Set the refresh token lifetime
    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }
}

/// Errors that can occur when building an [`AuthConfig`]
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthConfigError {
    #[error("{which} too short: got {actual} bytes, need at least {minimum}")]
    SecretTooShort {
        which: &'static str,
        actual: usize,
        minimum: usize,
    },

    #[error("access and refresh token secrets must be distinct")]
    SecretsNotDistinct,
}
