//! Account persistence
//!
//! The HTTP layer and the access guard only ever talk to [`AccountStore`];
//! the concrete backend is picked in `main` from configuration.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, NewAccount};

pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;

/// Account store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("account {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Account CRUD capability
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with its assigned id
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError>;

    /// All accounts ordered by id
    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn delete_account(&self, id: i64) -> Result<(), StoreError>;

    /// Connectivity check used by `/health`
    async fn ping(&self) -> Result<(), StoreError>;
}
