//! HTTP handlers

mod account;
mod auth;
mod health;
mod shared;

pub use account::{change_password, current_user, update_account, update_avatar, update_cover_image};
pub use auth::{login, logout, refresh, register};
pub use health::{health, ready};
