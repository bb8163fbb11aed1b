//! Bankline Backend Server
//!
//! Minimal banking REST API: open, list, fetch and delete accounts, and
//! submit transfer requests. Account-scoped routes require the token issued
//! when the account was opened.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use chrono::Duration;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use bankline_server::auth::TokenAuthority;
use bankline_server::config::Config;
use bankline_server::store::{AccountStore, InMemoryAccountStore, PgAccountStore};
use bankline_server::{app_router, db, middleware, AppState};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    if let Err(e) = run(config).await {
        tracing::error!(error = ?e, "Server terminated with error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(environment = config.environment.as_str(), "Starting Bankline");

    let tokens = TokenAuthority::new(
        &config.jwt_secret,
        Duration::hours(config.token_ttl_hours),
    )
    .context("Failed to initialize token authority")?;

    let accounts = build_store(&config).await?;

    let state = AppState::new(accounts, Arc::new(tokens));

    let mut app: Router = app_router(state).layer(configure_cors(&config));
    if config.environment.is_production() {
        app = app.layer(axum::middleware::from_fn(middleware::hsts_header));
    }

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("JSON API server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn AccountStore>> {
    match (&config.database_url, config.database_url_masked()) {
        (Some(url), Some(masked)) => {
            tracing::info!("Connecting to database at {}", masked);
            let pool = db::create_pool(url, config.db_max_connections).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgAccountStore::new(pool)))
        }
        _ => {
            tracing::warn!("DATABASE_URL not set, accounts are kept in memory only");
            Ok(Arc::new(InMemoryAccountStore::new()))
        }
    }
}

fn configure_cors(config: &Config) -> CorsLayer {
    let allowed_origins_str = config.cors_allowed_origins.clone().unwrap_or_default();

    if allowed_origins_str.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
