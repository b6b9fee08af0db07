//! PostgreSQL account repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::AccountRow;
use crate::repo::{AccountRepository, CreateAccount};

const ACCOUNT_COLUMNS: &str = "id, username, email, full_name, password_hash, \
     avatar_url, cover_image_url, refresh_token, created_at, updated_at";

/// PostgreSQL account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<AccountRow>> {
        let account = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<Option<AccountRow>> {
        let account = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE ($1::text IS NOT NULL AND username = $1)
               OR ($2::text IS NOT NULL AND email = $2)
            "#
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts
                (id, username, email, full_name, password_hash, avatar_url, cover_image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.password_hash)
        .bind(&account.avatar_url)
        .bind(&account.cover_image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn set_refresh_token(&self, id: Uuid, refresh_token: Option<&str>) -> DbResult<()> {
        sqlx::query("UPDATE accounts SET refresh_token = $1, updated_at = now() WHERE id = $2")
            .bind(refresh_token)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DbResult<()> {
        sqlx::query("UPDATE accounts SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_details(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET full_name = COALESCE($1, full_name),
                email = COALESCE($2, email),
                updated_at = now()
            WHERE id = $3
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(full_name)
        .bind(email)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_avatar_url(&self, id: Uuid, url: &str) -> DbResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET avatar_url = $1, updated_at = now()
            WHERE id = $2
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(url)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_cover_image_url(&self, id: Uuid, url: &str) -> DbResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET cover_image_url = $1, updated_at = now()
            WHERE id = $2
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(url)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
