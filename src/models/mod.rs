//! Data models for the Bankline API

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Bank account as owned by the account store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Random account number used for authorization, distinct from `id`
    pub number: i32,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Account data handed to the store before it assigns an id
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i32,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build a new account with a freshly drawn account number and zero balance
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            number: generate_account_number(),
            balance: 0,
            created_at: Utc::now(),
        }
    }

    /// Attach a store-assigned id
    pub fn into_account(self, id: i64) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// Draw a positive 31-bit account number.
///
/// Numbers are not unique by construction.
pub fn generate_account_number() -> i32 {
    rand::thread_rng().gen_range(1..=i32::MAX)
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// POST /account body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 100, message = "firstName must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName must not be empty"))]
    pub last_name: String,
}

/// POST /account response: the stored account plus its access token
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    #[serde(flatten)]
    pub account: Account,
    pub token: String,
}

/// DELETE /account/{id} acknowledgment
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAccountResponse {
    pub deleted: i64,
}

/// POST /transfer/ body, echoed back unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}
