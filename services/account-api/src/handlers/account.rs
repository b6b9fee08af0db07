//! Account handlers (password change, profile reads and updates)

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use harbor_types::AccountProfile;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::handlers::shared::stage_upload;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    pub success: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/users/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<ChangePasswordResponse>> {
    state
        .auth
        .change_password(auth_user.id(), &req.old_password, &req.new_password)
        .await?;

    Ok(Json(ChangePasswordResponse { success: true }))
}

/// GET /api/v1/users/current-user
pub async fn current_user(auth_user: AuthUser) -> Json<AccountProfile> {
    Json(auth_user.account)
}

/// PATCH /api/v1/users/update-account
///
/// Update display name and/or email; at least one must be present.
pub async fn update_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AccountProfile>> {
    let profile = state
        .auth
        .update_details(auth_user.id(), req.full_name.as_deref(), req.email.as_deref())
        .await?;

    Ok(Json(profile))
}

/// PATCH /api/v1/users/avatar
///
/// Replace the avatar with an uploaded `avatar` multipart file.
pub async fn update_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<AccountProfile>> {
    let media = upload_image_field(&state, multipart, "avatar").await?;
    let profile = state.auth.update_avatar(auth_user.id(), &media).await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/users/cover-image
///
/// Replace the cover image with an uploaded `coverImage` multipart file.
pub async fn update_cover_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<AccountProfile>> {
    let media = upload_image_field(&state, multipart, "coverImage").await?;
    let profile = state.auth.update_cover_image(auth_user.id(), &media).await?;
    Ok(Json(profile))
}

/// Stage the named multipart file field and push it to the media host,
/// returning the hosted URL. The update endpoints require the upload to
/// succeed; there is no account to fall back on partway through.
async fn upload_image_field(
    state: &AppState,
    mut multipart: Multipart,
    field_name: &'static str,
) -> ApiResult<String> {
    let mut staged = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(field_name) {
            staged = Some(stage_upload(field).await?);
        }
    }

    let Some(path) = staged else {
        return Err(ApiError::BadRequest(format!(
            "{field_name} file is required"
        )));
    };

    let media = state
        .media
        .upload(&path)
        .await
        .ok_or(ApiError::UploadFailed(field_name))?;

    Ok(media.url)
}
