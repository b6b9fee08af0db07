//! Media uploader contract

use async_trait::async_trait;
use std::path::Path;

/// A successfully hosted media asset
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Public HTTPS URL of the hosted asset
    pub url: String,
    /// Host-side identifier of the asset
    pub public_id: String,
}

/// External media host.
///
/// `upload` consumes the staged local file: implementations remove it
/// after the attempt regardless of outcome. A `None` return means the
/// upload failed; callers decide how to surface that and must not retry.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, local_path: &Path) -> Option<UploadedMedia>;
}
