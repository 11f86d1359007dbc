// ABOUTME: Server binary for the Bazaar AI shopping assistant backend
// ABOUTME: Wires configuration, resources, routes, and graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! # Bazaar Assist Server
//!
//! Starts the HTTP server for the storefront's AI shopping assistant.
//!
//! ## Usage
//!
//! ```bash
//! BAZAAR_GEMINI_API_KEY=... BAZAAR_STORE_URL=... BAZAAR_STORE_SERVICE_KEY=... \
//!     bazaar-assist-server
//! ```
//!
//! Log verbosity is controlled with `RUST_LOG` (default `info`).

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use bazaar_assist_server::{
    config::ServerConfig,
    logging,
    resources::ServerResources,
    routes::{AssistRoutes, HealthRoutes},
};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = ServerConfig::from_env();
    let port = config.http_port;
    let resources = Arc::new(ServerResources::from_config(config));

    let app = Router::new()
        .merge(HealthRoutes::routes())
        .merge(AssistRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("bazaar-assist-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolve when the process receives SIGINT
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
