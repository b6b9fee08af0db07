//! Harbor Auth Core - Authentication business logic
//!
//! Core authentication functionality: password hashing, access/refresh
//! token issuance and verification, and the session coordinator that ties
//! them to the credential store.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::*;
pub use error::*;
pub use password::*;
pub use service::*;
pub use token::*;
