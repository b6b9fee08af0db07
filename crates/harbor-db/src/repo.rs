//! Repository traits
//!
//! Define async repository interfaces for the credential store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::AccountRow;

/// Account repository trait
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<AccountRow>>;

    /// Find an account matching either identifier.
    ///
    /// Passing `None` for one side skips that match arm, so a login with
    /// only a username (or only an email) reuses the same query.
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<Option<AccountRow>>;

    /// Create a new account
    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow>;

    /// Store a new refresh token, or clear the stored one with `None`
    async fn set_refresh_token(&self, id: Uuid, refresh_token: Option<&str>) -> DbResult<()>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DbResult<()>;

    /// Update display name and/or email, returning the fresh row
    async fn update_details(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<AccountRow>;

    /// Replace the avatar URL, returning the fresh row
    async fn update_avatar_url(&self, id: Uuid, url: &str) -> DbResult<AccountRow>;

    /// Replace the cover image URL, returning the fresh row
    async fn update_cover_image_url(&self, id: Uuid, url: &str) -> DbResult<AccountRow>;
}

/// Create account input
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}
