//! Cloudinary upload client
//!
//! Signed uploads against the Cloudinary REST API. The signature is the
//! SHA-256 digest of the sorted parameter string with the API secret
//! appended, hex encoded.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;

use crate::error::MediaConfigError;
use crate::uploader::{MediaUploader, UploadedMedia};

/// Default Cloudinary API base URL
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Cloudinary account credentials
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// API base URL, overridable for tests
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self, MediaConfigError> {
        Ok(Self {
            cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME")
                .map_err(|_| MediaConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
            api_key: std::env::var("CLOUDINARY_API_KEY")
                .map_err(|_| MediaConfigError::Missing("CLOUDINARY_API_KEY"))?,
            api_secret: std::env::var("CLOUDINARY_API_SECRET")
                .map_err(|_| MediaConfigError::Missing("CLOUDINARY_API_SECRET"))?,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Upload endpoint for this account (resource type auto-detected)
    fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/auto/upload", self.api_base, self.cloud_name)
    }
}

/// Subset of the Cloudinary upload response we care about
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// Cloudinary media uploader
#[derive(Clone)]
pub struct CloudinaryUploader {
    config: CloudinaryConfig,
    http_client: reqwest::Client,
}

impl CloudinaryUploader {
    /// Create a new uploader with a pooled HTTP client
    pub fn new(config: CloudinaryConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
        }
    }

    async fn try_upload(&self, local_path: &Path) -> Result<UploadedMedia, UploadFailure> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| UploadFailure(format!("read staged file: {e}")))?;

        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(&format!("timestamp={timestamp}"), &self.config.api_secret);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .http_client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadFailure(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(UploadFailure(format!(
                "upload returned status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadFailure(format!("parse response: {e}")))?;

        Ok(UploadedMedia {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }
}

struct UploadFailure(String);

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, local_path: &Path) -> Option<UploadedMedia> {
        let result = self.try_upload(local_path).await;

        // The staged file is temporary either way
        if let Err(e) = tokio::fs::remove_file(local_path).await {
            tracing::debug!("Failed to remove staged file {}: {}", local_path.display(), e);
        }

        match result {
            Ok(media) => {
                tracing::info!(url = %media.url, "File uploaded");
                Some(media)
            }
            Err(UploadFailure(reason)) => {
                tracing::warn!("Media upload failed: {}", reason);
                None
            }
        }
    }
}

impl std::fmt::Debug for CloudinaryUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryUploader")
            .field("cloud_name", &self.config.cloud_name)
            .finish_non_exhaustive()
    }
}

/// SHA-256 request signature: digest of the parameter string with the
/// API secret appended.
fn sign_params(params: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(params.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
