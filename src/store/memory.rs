//! In-memory account store

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::{AccountStore, StoreError};
use crate::models::{Account, NewAccount};

/// Process-local store; ids start at 1 and are never reused
#[derive(Debug)]
pub struct InMemoryAccountStore {
    accounts: RwLock<BTreeMap<i64, Account>>,
    next_id: AtomicI64,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let account = account.into_account(id);

        self.accounts.write().await.insert(id, account.clone());

        Ok(account)
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.accounts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.read().await.values().cloned().collect())
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        self.accounts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let store = InMemoryAccountStore::new();

        let first = store.create_account(NewAccount::new("Ada", "Lovelace")).await.unwrap();
        let second = store.create_account(NewAccount::new("Alan", "Turing")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let store = InMemoryAccountStore::new();
        let created = store.create_account(NewAccount::new("Ada", "Lovelace")).await.unwrap();

        assert_eq!(store.get_account_by_id(created.id).await.unwrap(), created);
        assert_eq!(store.get_accounts().await.unwrap(), vec![created]);
        assert!(matches!(
            store.get_account_by_id(99).await,
            Err(StoreError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_not_repeatable() {
        let store = InMemoryAccountStore::new();
        let created = store.create_account(NewAccount::new("Ada", "Lovelace")).await.unwrap();

        store.delete_account(created.id).await.unwrap();

        assert!(store.get_accounts().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_account(created.id).await,
            Err(StoreError::NotFound(_))
        ));
        // ids are not reused after deletion
        let next = store.create_account(NewAccount::new("Alan", "Turing")).await.unwrap();
        assert_eq!(next.id, 2);
    }
}
