//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::TokenAuthority;
use crate::store::AccountStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenAuthority>,
}

impl AppState {
    pub fn new(accounts: Arc<dyn AccountStore>, tokens: Arc<TokenAuthority>) -> Self {
        Self { accounts, tokens }
    }
}

impl FromRef<AppState> for Arc<dyn AccountStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.accounts.clone()
    }
}

impl FromRef<AppState> for Arc<TokenAuthority> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}
