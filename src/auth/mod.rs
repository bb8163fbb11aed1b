//! Account authentication for Bankline
//!
//! - Account token issuance and verification (HS256 JWT)
//! - Per-account access checks for account-scoped routes

mod guard;
mod jwt;

pub use guard::{authorize_account_access, extract_token, parse_account_id, AccessDenied};
pub use jwt::{AccountClaims, JwtError, TokenAuthority};
