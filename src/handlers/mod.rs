//! API handlers for the Bankline service

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{create_account, delete_account, get_account_by_id, list_accounts};
pub use health::{health_check, root};
pub use transfer::transfer;
