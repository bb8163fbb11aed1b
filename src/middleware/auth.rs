//! Account access middleware
//!
//! Wraps account-scoped routes so the handler only runs for the owner of the
//! account named by the `{id}` path segment.

use axum::{
    extract::{rejection::PathRejection, Path, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::authorize_account_access;
use crate::error::ApiError;
use crate::state::AppState;

/// Middleware enforcing that the bearer token belongs to the path's account.
///
/// Must be installed with `route_layer` on a route that has an `id` segment.
/// A segment that fails to decode is still run through the guard, so the
/// token is checked first and the denial stays a JSON 403. On denial the
/// wrapped handler is never invoked.
///
/// # Example
///
/// ```rust,ignore
/// Router::new()
///     .route("/account/:id", get(get_account_by_id))
///     .route_layer(axum::middleware::from_fn_with_state(state, require_account_owner))
/// ```
pub async fn require_account_owner(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    request: Request,
    next: Next,
) -> Response {
    let raw_id = path.ok().map(|Path(raw_id)| raw_id);

    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let decision = authorize_account_access(
        &state.tokens,
        state.accounts.as_ref(),
        authorization,
        raw_id.as_deref(),
    )
    .await;

    match decision {
        Ok(account) => {
            tracing::debug!(account_id = account.id, "Account access granted");
            next.run(request).await
        }
        Err(denied) => {
            tracing::warn!(
                path_id = ?raw_id,
                reason = denied.reason(),
                "Account access denied"
            );
            ApiError::from(denied).into_response()
        }
    }
}
