//! Harbor Types - Shared domain types
//!
//! This crate contains domain types used across Harbor services:
//! - Account identity and sanitized account projections
//! - Token pairs returned after authentication

pub mod account;
pub mod token;

pub use account::*;
pub use token::*;
