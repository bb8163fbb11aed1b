//! Bankline Backend Library
//!
//! Account CRUD over a pluggable store, with per-account token access control
//! on account-scoped routes.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use routes::app_router;
pub use state::AppState;
