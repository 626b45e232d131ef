pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{any, get};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::context::ProtocolContext;
use state::AppState;

/// Build the HTTP surface: dashboard JSON endpoints plus the node forwarder.
pub fn router(state: AppState) -> Router {
    let prefix = state.inner.forward.prefix.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(|| async { "ok" }))
        // Dashboard
        .route("/api/markets", get(handlers::markets::get_markets))
        .route("/api/balance", get(handlers::balance::get_balance))
        // Node forwarder
        .route(&prefix, any(handlers::forward::forward))
        .route(&format!("{prefix}/{{*path}}"), any(handlers::forward::forward))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let addr = format!("{}:{}", config.proxy.host, config.proxy.port);
    let proxy = config.proxy.clone();
    let context = Arc::new(ProtocolContext::new(config));
    let state = AppState::new(context, &proxy);
    let prefix = state.inner.forward.prefix.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    info!(%addr, "scallop-dash server listening");
    info!("  Health:    GET  http://{addr}/health");
    info!("  Markets:   GET  http://{addr}/api/markets");
    info!("  Balance:   GET  http://{addr}/api/balance?address=&coin_type=");
    info!("  Forwarder: ANY  http://{addr}{prefix}/* -> {}", proxy.upstream);

    axum::serve(listener, app).await.context("running server")?;

    Ok(())
}
