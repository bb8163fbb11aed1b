//! Account HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Account, CreateAccountRequest, CreateAccountResponse, DeleteAccountResponse, NewAccount,
};
use crate::state::AppState;

fn parse_account_id(raw_id: &str) -> ApiResult<i64> {
    auth::parse_account_id(raw_id)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid id given {}", raw_id)))
}

/// GET /account - List all accounts
pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Json<Vec<Account>>> {
    let accounts = state.accounts.get_accounts().await?;
    Ok(Json(accounts))
}

/// POST /account - Open an account and issue its access token
pub async fn create_account(
    State(state): State<AppState>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateAccountResponse>)> {
    let Json(req) = body?;
    req.validate()?;

    let account = state
        .accounts
        .create_account(NewAccount::new(req.first_name, req.last_name))
        .await?;

    // Issue only once the account is persisted
    let token = state.tokens.issue(account.number)?;

    tracing::info!(
        account_id = account.id,
        expires_in_hours = state.tokens.ttl().num_hours(),
        "Account created and token issued"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse { account, token }),
    ))
}

/// GET /account/:id - Fetch one account (guarded)
pub async fn get_account_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Account>> {
    let id = parse_account_id(&raw_id)?;
    let account = state.accounts.get_account_by_id(id).await?;
    Ok(Json(account))
}

/// DELETE /account/:id - Delete one account (guarded)
pub async fn delete_account(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DeleteAccountResponse>> {
    let id = parse_account_id(&raw_id)?;
    state.accounts.delete_account(id).await?;

    tracing::info!(account_id = id, "Account deleted");

    Ok(Json(DeleteAccountResponse { deleted: id }))
}
