/*
 * Responsibility
 * - Load Config → build collaborators (identity provider, profile store) → assemble the Router
 * - Apply middleware (HTTP / security headers / CORS)
 * - Serve with axum::serve() until ctrl-c
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware;
use crate::services::identity::build_identity_provider;
use crate::services::profiles::PgProfileStore;
use crate::state::AppState;
use crate::api;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,profile_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing so they are not lost with stderr.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so wiring bugs get noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let identity = build_identity_provider(config)?;

    let profiles = PgProfileStore::connect(
        &config.database_url,
        config.database_max_connections,
        config.database_acquire_timeout,
    )
    .await?;

    Ok(
        AppState::new(identity, Arc::new(profiles), config.app_env)
            .with_session_cookie(config.session_cookie_name.as_deref()),
    )
}

/// The versioned API with its auth chain, without the transport layers.
pub fn build_api(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = build_api(state);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.http_limits)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
