//! Configuration for the Account API service.

use harbor_auth_core::AuthConfig;
use harbor_media::CloudinaryConfig;
use std::time::Duration;

/// Account API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Media host credentials
    pub cloudinary: CloudinaryConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Token signing secrets (minimum 32 bytes each, must differ)
        let access_token_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let refresh_token_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .map_err(|_| ConfigError::Missing("REFRESH_TOKEN_SECRET"))?;

        // Token lifetimes
        let access_ttl_minutes: u64 = std::env::var("ACCESS_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_TTL_MINUTES"))?;

        let refresh_ttl_days: u64 = std::env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_TOKEN_TTL_DAYS"))?;

        // Build auth config
        let auth = AuthConfig::try_new(&access_token_secret, &refresh_token_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_access_token_ttl(Duration::from_secs(access_ttl_minutes * 60))
            .with_refresh_token_ttl(Duration::from_secs(refresh_ttl_days * 24 * 3600));

        // Media host
        let cloudinary = CloudinaryConfig::from_env()?;

        Ok(Self {
            http_port,
            database_url,
            auth,
            cloudinary,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),

    #[error("Media config error: {0}")]
    Media(#[from] harbor_media::MediaConfigError),
}
