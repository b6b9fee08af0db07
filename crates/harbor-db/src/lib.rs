//! Harbor DB - Database abstractions
//!
//! SQLx-based credential store for Harbor services.
//!
//! # Example
//!
//! ```rust,ignore
//! use harbor_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/harbor").await?;
//! let repos = Repositories::new(pool);
//!
//! let account = repos.accounts.find_by_username_or_email(Some("nova"), None).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
