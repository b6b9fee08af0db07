//! Mock repositories for testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use harbor_db::{AccountRepository, AccountRow, CreateAccount, DbError, DbResult};

/// In-memory account repository for testing
#[derive(Default, Clone)]
pub struct MockAccountRepository {
    accounts: Arc<DashMap<Uuid, AccountRow>>,
    by_username: Arc<DashMap<String, Uuid>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test account directly
    pub fn insert_account(&self, account: AccountRow) {
        self.by_username.insert(account.username.clone(), account.id);
        self.by_email.insert(account.email.clone(), account.id);
        self.accounts.insert(account.id, account);
    }

    /// Read back the stored refresh token for assertions
    pub fn stored_refresh_token(&self, id: Uuid) -> Option<String> {
        self.accounts
            .get(&id)
            .and_then(|r| r.value().refresh_token.clone())
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<AccountRow>> {
        Ok(self.accounts.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<Option<AccountRow>> {
        let id = username
            .and_then(|u| self.by_username.get(u).map(|r| *r.value()))
            .or_else(|| email.and_then(|e| self.by_email.get(e).map(|r| *r.value())));
        Ok(id.and_then(|id| self.accounts.get(&id).map(|r| r.value().clone())))
    }

    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow> {
        // Enforce the unique constraints the real table carries
        if self.by_username.contains_key(&account.username)
            || self.by_email.contains_key(&account.email)
        {
            return Err(DbError::UniqueViolation);
        }

        let row = AccountRow {
            id: account.id,
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            password_hash: account.password_hash,
            avatar_url: account.avatar_url,
            cover_image_url: account.cover_image_url,
            refresh_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.insert_account(row.clone());
        Ok(row)
    }

    async fn set_refresh_token(&self, id: Uuid, refresh_token: Option<&str>) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id) {
            account.refresh_token = refresh_token.map(String::from);
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id) {
            account.password_hash = password_hash.to_string();
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_details(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<AccountRow> {
        if let Some(new_email) = email {
            if let Some(owner) = self.by_email.get(new_email) {
                if *owner.value() != id {
                    return Err(DbError::UniqueViolation);
                }
            }
        }

        let mut account = self.accounts.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(full_name) = full_name {
            account.full_name = full_name.to_string();
        }
        if let Some(new_email) = email {
            self.by_email.remove(&account.email);
            self.by_email.insert(new_email.to_string(), id);
            account.email = new_email.to_string();
        }
        account.updated_at = Utc::now();
        Ok(account.value().clone())
    }

    async fn update_avatar_url(&self, id: Uuid, url: &str) -> DbResult<AccountRow> {
        let mut account = self.accounts.get_mut(&id).ok_or(DbError::NotFound)?;
        account.avatar_url = url.to_string();
        account.updated_at = Utc::now();
        Ok(account.value().clone())
    }

    async fn update_cover_image_url(&self, id: Uuid, url: &str) -> DbResult<AccountRow> {
        let mut account = self.accounts.get_mut(&id).ok_or(DbError::NotFound)?;
        account.cover_image_url = Some(url.to_string());
        account.updated_at = Utc::now();
        Ok(account.value().clone())
    }
}
