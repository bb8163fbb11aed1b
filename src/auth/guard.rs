//! Account access guard
//!
//! Decides whether a request carrying an account token may touch the account
//! named in its path. Checks run in a fixed order and the first failure is
//! final:
//!
//! 1. a token must be present
//! 2. the token must verify (signature, expiry, claim shape)
//! 3. the path id must be an integer
//! 4. the id must resolve to an account
//! 5. the account's number must equal the token's account number

use thiserror::Error;

use super::jwt::TokenAuthority;
use crate::models::Account;
use crate::store::AccountStore;

/// Reason an access check was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("invalid token permission denied")]
    InvalidToken,

    #[error("invalid id permission denied")]
    InvalidId,

    #[error("account not found permission denied")]
    AccountNotFound,

    #[error("permission denied")]
    PermissionDenied,
}

impl AccessDenied {
    /// Short machine-friendly reason, used in logs
    pub fn reason(&self) -> &'static str {
        match self {
            AccessDenied::InvalidToken => "invalid token",
            AccessDenied::InvalidId => "invalid id",
            AccessDenied::AccountNotFound => "account not found",
            AccessDenied::PermissionDenied => "permission denied",
        }
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// Accepts the bare token as well as `Bearer <token>`.
pub fn extract_token(authorization: Option<&str>) -> Option<&str> {
    let value = authorization?.trim_start();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ => value,
    }
    .trim();

    (!token.is_empty()).then_some(token)
}

/// Parse an account id path segment.
///
/// Shared by the guard and the account handlers so both accept exactly the
/// same ids. No whitespace trimming.
pub fn parse_account_id(raw_id: &str) -> Option<i64> {
    raw_id.parse::<i64>().ok()
}

/// Run the access check for `raw_id` and return the resolved account on success.
///
/// `raw_id` is `None` when the path segment could not be decoded; that is an
/// invalid id, reported only after the token verified. The store is consulted
/// only after the token verified and the id parsed.
pub async fn authorize_account_access(
    tokens: &TokenAuthority,
    accounts: &dyn AccountStore,
    authorization: Option<&str>,
    raw_id: Option<&str>,
) -> Result<Account, AccessDenied> {
    let token = extract_token(authorization).ok_or(AccessDenied::InvalidToken)?;

    let claims = tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        AccessDenied::InvalidToken
    })?;

    let id = raw_id
        .and_then(parse_account_id)
        .ok_or(AccessDenied::InvalidId)?;

    let account = accounts.get_account_by_id(id).await.map_err(|e| {
        tracing::debug!(account_id = id, error = %e, "Account lookup failed");
        AccessDenied::AccountNotFound
    })?;

    if i64::from(account.number) != claims.account_number {
        return Err(AccessDenied::PermissionDenied);
    }

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use crate::models::NewAccount;
    use crate::store::{InMemoryAccountStore, StoreError};

    fn authority() -> TokenAuthority {
        TokenAuthority::new("guard-test-secret", Duration::hours(24)).unwrap()
    }

    /// Store that fails the test if the guard ever reaches it
    struct UnreachableStore;

    #[async_trait]
    impl AccountStore for UnreachableStore {
        async fn create_account(&self, _: NewAccount) -> Result<Account, StoreError> {
            panic!("store must not be called");
        }
        async fn get_account_by_id(&self, _: i64) -> Result<Account, StoreError> {
            panic!("store must not be called");
        }
        async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
            panic!("store must not be called");
        }
        async fn delete_account(&self, _: i64) -> Result<(), StoreError> {
            panic!("store must not be called");
        }
        async fn ping(&self) -> Result<(), StoreError> {
            panic!("store must not be called");
        }
    }

    /// Store whose lookups always fail with a backend error
    struct BrokenStore;

    #[async_trait]
    impl AccountStore for BrokenStore {
        async fn create_account(&self, _: NewAccount) -> Result<Account, StoreError> {
            Err(StoreError::Database("connection reset".to_string()))
        }
        async fn get_account_by_id(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::Database("connection reset".to_string()))
        }
        async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
            Err(StoreError::Database("connection reset".to_string()))
        }
        async fn delete_account(&self, _: i64) -> Result<(), StoreError> {
            Err(StoreError::Database("connection reset".to_string()))
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Database("connection reset".to_string()))
        }
    }

    async fn store_with(names: &[(&str, &str)]) -> (InMemoryAccountStore, Vec<Account>) {
        let store = InMemoryAccountStore::new();
        let mut created = Vec::new();
        for (first, last) in names {
            created.push(
                store
                    .create_account(NewAccount::new(*first, *last))
                    .await
                    .unwrap(),
            );
        }
        (store, created)
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token(Some("abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_token(Some("bearer  abc ")), Some("abc"));
        assert_eq!(extract_token(Some("   ")), None);
        assert_eq!(extract_token(Some("Bearer ")), None);
        assert_eq!(extract_token(None), None);
    }

    #[tokio::test]
    async fn test_owner_is_allowed() {
        let tokens = authority();
        let (store, accounts) = store_with(&[("Ada", "Lovelace")]).await;
        let ada = &accounts[0];
        let token = tokens.issue(ada.number).unwrap();

        let resolved = authorize_account_access(&tokens, &store, Some(&token), Some("1"))
            .await
            .unwrap();
        assert_eq!(&resolved, ada);
    }

    #[tokio::test]
    async fn test_other_account_is_permission_denied() {
        let tokens = authority();
        let (store, accounts) = store_with(&[("Ada", "Lovelace")]).await;
        let ada = &accounts[0];
        store
            .create_account(NewAccount {
                number: ada.number.wrapping_add(1).max(1),
                ..NewAccount::new("Alan", "Turing")
            })
            .await
            .unwrap();
        let ada_token = tokens.issue(ada.number).unwrap();

        let result =
            authorize_account_access(&tokens, &store, Some(&ada_token), Some("2")).await;
        assert_eq!(result.unwrap_err(), AccessDenied::PermissionDenied);
    }

    #[tokio::test]
    async fn test_missing_and_empty_token() {
        let tokens = authority();

        let result = authorize_account_access(&tokens, &UnreachableStore, None, Some("1")).await;
        assert_eq!(result.unwrap_err(), AccessDenied::InvalidToken);

        let result =
            authorize_account_access(&tokens, &UnreachableStore, Some(""), Some("1")).await;
        assert_eq!(result.unwrap_err(), AccessDenied::InvalidToken);
    }

    #[tokio::test]
    async fn test_token_checked_before_id() {
        let tokens = authority();

        let result = authorize_account_access(
            &tokens,
            &UnreachableStore,
            Some("garbage"),
            Some("abc"),
        )
        .await;
        assert_eq!(result.unwrap_err(), AccessDenied::InvalidToken);
    }

    #[tokio::test]
    async fn test_expired_token_denied() {
        let tokens = authority();
        let (store, accounts) = store_with(&[("Ada", "Lovelace")]).await;
        let token = tokens
            .issue_at(accounts[0].number, Utc::now() - Duration::hours(24) - Duration::seconds(5))
            .unwrap();

        let result = authorize_account_access(&tokens, &store, Some(&token), Some("1")).await;
        assert_eq!(result.unwrap_err(), AccessDenied::InvalidToken);
    }

    #[tokio::test]
    async fn test_non_numeric_id_skips_store() {
        let tokens = authority();
        let token = tokens.issue(42).unwrap();

        for raw_id in ["abc", "1.5", "", " 1", "1 ", "99999999999999999999"] {
            let result = authorize_account_access(
                &tokens,
                &UnreachableStore,
                Some(&token),
                Some(raw_id),
            )
            .await;
            assert_eq!(result.unwrap_err(), AccessDenied::InvalidId);
        }
    }

    #[tokio::test]
    async fn test_undecodable_id_is_invalid_after_token_check() {
        let tokens = authority();
        let token = tokens.issue(42).unwrap();

        let result = authorize_account_access(&tokens, &UnreachableStore, None, None).await;
        assert_eq!(result.unwrap_err(), AccessDenied::InvalidToken);

        let result =
            authorize_account_access(&tokens, &UnreachableStore, Some(&token), None).await;
        assert_eq!(result.unwrap_err(), AccessDenied::InvalidId);
    }

    #[test]
    fn test_parse_account_id() {
        assert_eq!(parse_account_id("17"), Some(17));
        assert_eq!(parse_account_id(" 17"), None);
        assert_eq!(parse_account_id("17 "), None);
        assert_eq!(parse_account_id("abc"), None);
    }

    #[tokio::test]
    async fn test_deleted_account_not_found() {
        let tokens = authority();
        let (store, accounts) = store_with(&[("Ada", "Lovelace")]).await;
        let token = tokens.issue(accounts[0].number).unwrap();

        store.delete_account(accounts[0].id).await.unwrap();

        let result = authorize_account_access(&tokens, &store, Some(&token), Some("1")).await;
        assert_eq!(result.unwrap_err(), AccessDenied::AccountNotFound);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_found() {
        let tokens = authority();
        let token = tokens.issue(42).unwrap();

        let result = authorize_account_access(&tokens, &BrokenStore, Some(&token), Some("1")).await;
        assert_eq!(result.unwrap_err(), AccessDenied::AccountNotFound);
    }

    #[test]
    fn test_denial_messages() {
        assert_eq!(
            AccessDenied::InvalidToken.to_string(),
            "invalid token permission denied"
        );
        assert_eq!(AccessDenied::InvalidId.reason(), "invalid id");
        assert_eq!(AccessDenied::PermissionDenied.to_string(), "permission denied");
    }
}
