//! Transfer routes

use axum::{routing::post, Router};

use crate::handlers::transfer;
use crate::state::AppState;

pub fn transfer_routes() -> Router<AppState> {
    Router::new().route("/transfer/", post(transfer::transfer))
}
