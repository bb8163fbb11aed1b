//! Route definitions for the Bankline API

mod account;
mod transfer;

use axum::{routing::get, Router};

use crate::handlers::{health_check, root};
use crate::middleware;
use crate::state::AppState;

pub use account::account_routes;
pub use transfer::transfer_routes;

/// Assemble the full API router over `state`.
///
/// CORS and HSTS depend on deployment configuration and are layered on in `main`.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(account_routes(state.clone()))
        .merge(transfer_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
