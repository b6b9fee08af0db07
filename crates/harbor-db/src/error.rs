//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Unique constraint violated (duplicate username or email)
    #[error("unique constraint violated")]
    UniqueViolation,
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        // Postgres unique_violation, surfaced distinctly so callers can map
        // it to a conflict rather than an internal error.
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                Self::UniqueViolation
            }
            other => Self::Sqlx(other),
        }
    }
}

/// Result alias for database operations
pub type DbResult<T> = Result<T, DbError>;
