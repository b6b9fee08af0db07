//! Shared handler utilities
//!
//! Multipart staging used by registration and the image update
//! endpoints. Uploaded files land in the OS temp directory under a
//! random name; the media uploader removes them after the attempt.

use std::path::PathBuf;

use axum::extract::multipart::Field;

use crate::error::ApiError;

/// Stage an uploaded multipart file to the local temp directory.
///
/// The staged name is randomized so concurrent uploads of the same
/// filename never collide.
pub async fn stage_upload(field: Field<'_>) -> Result<PathBuf, ApiError> {
    let file_name = field
        .file_name()
        .map(sanitize_file_name)
        .unwrap_or_else(|| "upload".to_string());

    let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), file_name));

    let bytes = field.bytes().await?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("stage upload: {e}")))?;

    Ok(path)
}

/// Remove a staged file that will not be uploaded after all
pub async fn discard_staged(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!("Failed to remove staged file {}: {}", path.display(), e);
    }
}

/// Strip any path components from a client-supplied filename
fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("upload")
        .to_string()
}
