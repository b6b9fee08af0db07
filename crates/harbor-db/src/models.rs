//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Rows carry the credential fields; the sanitized projection lives in
//! `harbor_types::AccountProfile`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use harbor_types::{AccountId, AccountProfile};

/// Account row from the database
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    /// Convert to domain AccountId
    pub fn account_id(&self) -> AccountId {
        AccountId(self.id)
    }

    /// Project into the sanitized response shape, dropping the password
    /// hash and stored refresh token.
    pub fn into_profile(self) -> AccountProfile {
        AccountProfile {
            id: AccountId(self.id),
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            avatar_url: self.avatar_url,
            cover_image_url: self.cover_image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
