//! Middleware for the Bankline API
//!
//! Request tracing, security headers, and per-account access control.

pub mod auth;
mod security;
mod tracing;

pub use auth::require_account_owner;
pub use security::{hsts_header, security_headers};
pub use tracing::{request_tracing, REQUEST_ID_HEADER};
