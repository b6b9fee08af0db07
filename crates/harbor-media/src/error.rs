//! Media configuration errors

use thiserror::Error;

/// Errors raised while building the media uploader configuration
#[derive(Debug, Error)]
pub enum MediaConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
