//! Transfer handler
//!
//! Transfers are accepted and echoed back; no balances move.

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::ApiResult;
use crate::models::TransferRequest;

/// POST /transfer/ - Echo the submitted transfer request
pub async fn transfer(
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<Json<TransferRequest>> {
    let Json(req) = body?;

    tracing::debug!(to_account = req.to_account, amount = req.amount, "Transfer received");

    Ok(Json(req))
}
