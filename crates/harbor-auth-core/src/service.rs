//! Auth service - ties together password hashing, token issuance and
//! verification, and the credential store.
//!
//! This is the session coordinator: register, login, logout, refresh,
//! password change, and profile updates all flow through here. Handlers
//! stay thin and thread the authenticated identity explicitly.

use std::sync::Arc;

use harbor_db::{AccountRepository, AccountRow, CreateAccount};
use harbor_types::{AccountId, AccountProfile, TokenPair};

use crate::{AuthConfig, AuthError, PasswordHasher, TokenIssuer, TokenVerifier};

/// Input for account registration.
///
/// Avatar is mandatory, cover image optional; both URLs come from the
/// media uploader, which the HTTP layer drives before calling
/// [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

/// Login credentials; at least one identifier must be present
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Successful login outcome
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: AccountProfile,
    pub tokens: TokenPair,
}

/// Authentication service
///
/// Generic over the account repository so tests run against an in-memory
/// mock while the service binary uses Postgres.
pub struct AuthService<R: AccountRepository> {
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    repo: Arc<R>,
}

impl<R: AccountRepository> AuthService<R> {
    /// Create a new auth service
    pub fn new(config: &AuthConfig, repo: Arc<R>) -> Self {
        Self {
            hasher: PasswordHasher::new(),
            issuer: TokenIssuer::new(config),
            verifier: TokenVerifier::new(config),
            repo,
        }
    }

    /// Replace the password hasher (tests use cheap Argon2 parameters)
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new account.
    ///
    /// All four identity fields must be non-empty after trimming; the
    /// username is lowercased before storage. Returns Conflict if the
    /// username or email is already taken.
    pub async fn register(&self, input: NewAccount) -> Result<AccountProfile, AuthError> {
        let full_name = input.full_name.trim().to_string();
        let email = input.email.trim().to_string();
        let username = input.username.trim().to_lowercase();
        // The password is stored and verified exactly as supplied;
        // trimming only gates the emptiness check.
        let password = input.password;

        if full_name.is_empty()
            || email.is_empty()
            || username.is_empty()
            || password.trim().is_empty()
        {
            return Err(AuthError::Validation("all fields are required".to_string()));
        }
        if input.avatar_url.is_empty() {
            return Err(AuthError::Validation("avatar is required".to_string()));
        }

        if self
            .repo
            .find_by_username_or_email(Some(&username), Some(&email))
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict(
                "account with this username or email already exists".to_string(),
            ));
        }

        let password_hash = self
            .hasher
            .hash(&password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // A concurrent registration can still slip past the pre-check;
        // the unique constraint maps to the same Conflict.
        let row = self
            .repo
            .create(CreateAccount {
                id: AccountId::new().0,
                username,
                email,
                full_name,
                password_hash,
                avatar_url: input.avatar_url,
                cover_image_url: input.cover_image_url,
            })
            .await?;

        tracing::info!(account_id = %row.id, "Account registered");
        Ok(row.into_profile())
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Authenticate with username-or-email plus password, issuing a fresh
    /// token pair and persisting the refresh token.
    ///
    /// A second login from another device overwrites the stored refresh
    /// token, silently invalidating the first session's refresh token.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, AuthError> {
        let username = credentials
            .username
            .as_deref()
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty());
        let email = credentials
            .email
            .as_deref()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        if username.is_none() && email.is_none() {
            return Err(AuthError::Validation(
                "username or email is required".to_string(),
            ));
        }

        let account = self
            .repo
            .find_by_username_or_email(username.as_deref(), email.as_deref())
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let password_ok = self
            .hasher
            .verify(&credentials.password, &account.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !password_ok {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_and_store_tokens(&account).await?;

        tracing::info!(account_id = %account.id, "Login succeeded");
        Ok(LoginOutcome {
            account: account.into_profile(),
            tokens,
        })
    }

    /// Clear the stored refresh token. Idempotent: logging out twice is
    /// not an error.
    pub async fn logout(&self, account_id: AccountId) -> Result<(), AuthError> {
        self.repo.set_refresh_token(account_id.0, None).await?;
        tracing::info!(account_id = %account_id, "Logged out");
        Ok(())
    }

    // =========================================================================
    // Token refresh
    // =========================================================================

    /// Exchange a refresh token for a new token pair, rotating the stored
    /// refresh token so the presented one can never be replayed.
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair, AuthError> {
        let presented = presented.trim();
        if presented.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let claims = self.verifier.decode_refresh(presented)?;
        let account_id = claims.account_id().ok_or(AuthError::InvalidToken)?;

        let account = self
            .repo
            .find_by_id(account_id.0)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if let Err(e) = self
            .verifier
            .verify_refresh(presented, account.refresh_token.as_deref())
        {
            // Reuse of a rotated token is worth telling apart from
            // forgery in the logs; the caller sees the same 401 either way.
            if matches!(e, AuthError::TokenReused) {
                tracing::warn!(account_id = %account.id, "Stale refresh token presented");
            }
            return Err(e);
        }

        let tokens = self.issue_and_store_tokens(&account).await?;
        tracing::debug!(account_id = %account.id, "Refresh token rotated");
        Ok(tokens)
    }

    // =========================================================================
    // Password change
    // =========================================================================

    /// Change the account password after verifying the old one.
    ///
    /// The stored refresh token is left untouched; existing sessions stay
    /// valid (scope choice).
    pub async fn change_password(
        &self,
        account_id: AccountId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.trim().is_empty() {
            return Err(AuthError::Validation(
                "new password is required".to_string(),
            ));
        }

        let account = self
            .repo
            .find_by_id(account_id.0)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let old_ok = self
            .hasher
            .verify(old_password, &account.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !old_ok {
            return Err(AuthError::Validation(
                "old password is incorrect".to_string(),
            ));
        }

        let new_hash = self
            .hasher
            .hash(new_password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        self.repo
            .update_password_hash(account_id.0, &new_hash)
            .await?;

        tracing::info!(account_id = %account_id, "Password changed");
        Ok(())
    }

    // =========================================================================
    // Authenticated reads and profile updates
    // =========================================================================

    /// Verify an access token and load the account it names.
    ///
    /// Backs the HTTP extractor; the returned profile is threaded through
    /// handlers explicitly.
    pub async fn authenticate(&self, access_token: &str) -> Result<AccountProfile, AuthError> {
        let claims = self.verifier.verify_access(access_token)?;
        let account_id = claims.account_id().ok_or(AuthError::InvalidToken)?;

        let account = self
            .repo
            .find_by_id(account_id.0)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(account.into_profile())
    }

    /// Fetch the sanitized profile for an account
    pub async fn current_account(&self, account_id: AccountId) -> Result<AccountProfile, AuthError> {
        let account = self
            .repo
            .find_by_id(account_id.0)
            .await?
            .ok_or(AuthError::AccountNotFound)?;
        Ok(account.into_profile())
    }

    /// Update display name and/or email
    pub async fn update_details(
        &self,
        account_id: AccountId,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<AccountProfile, AuthError> {
        let full_name = full_name.map(str::trim).filter(|s| !s.is_empty());
        let email = email.map(str::trim).filter(|s| !s.is_empty());

        if full_name.is_none() && email.is_none() {
            return Err(AuthError::Validation(
                "full name or email is required".to_string(),
            ));
        }

        let row = self
            .repo
            .update_details(account_id.0, full_name, email)
            .await?;
        Ok(row.into_profile())
    }

    /// Replace the avatar URL after a successful media upload
    pub async fn update_avatar(
        &self,
        account_id: AccountId,
        url: &str,
    ) -> Result<AccountProfile, AuthError> {
        if url.is_empty() {
            return Err(AuthError::Validation("avatar url is required".to_string()));
        }
        let row = self.repo.update_avatar_url(account_id.0, url).await?;
        Ok(row.into_profile())
    }

    /// Replace the cover image URL after a successful media upload
    pub async fn update_cover_image(
        &self,
        account_id: AccountId,
        url: &str,
    ) -> Result<AccountProfile, AuthError> {
        if url.is_empty() {
            return Err(AuthError::Validation(
                "cover image url is required".to_string(),
            ));
        }
        let row = self.repo.update_cover_image_url(account_id.0, url).await?;
        Ok(row.into_profile())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Issue a fresh token pair and persist the refresh token, overwriting
    /// any previously stored one.
    async fn issue_and_store_tokens(&self, account: &AccountRow) -> Result<TokenPair, AuthError> {
        let access_token = self.issuer.issue_access_token(account)?;
        let refresh_token = self.issuer.issue_refresh_token(account.account_id())?;

        self.repo
            .set_refresh_token(account.id, Some(&refresh_token))
            .await?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.issuer.access_ttl().as_secs(),
        ))
    }
}

impl<R: AccountRepository> std::fmt::Debug for AuthService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}
