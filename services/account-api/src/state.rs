//! Application state

use std::ops::Deref;
use std::sync::Arc;

use harbor_auth_core::AuthService;
use harbor_db::pg::PgAccountRepository;
use harbor_db::DbPool;
use harbor_media::MediaUploader;

use crate::config::Config;

/// Type alias for the auth service with the concrete repository type
pub type AuthServiceImpl = AuthService<PgAccountRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for account, credential, and token management
    pub auth: Arc<AuthServiceImpl>,
    /// External media host for avatar and cover uploads
    pub media: Arc<dyn MediaUploader>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        auth: AuthServiceImpl,
        media: Arc<dyn MediaUploader>,
        pool: DbPool,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            media,
            pool: SharedPool(Arc::new(pool)),
            config: Arc::new(config),
        }
    }
}
