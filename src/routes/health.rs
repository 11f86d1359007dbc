// ABOUTME: Health check route for liveness probes
// ABOUTME: Reports service name and version without touching any collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Health routes

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

/// Health check route handlers
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health routes
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> impl IntoResponse {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}
