// ABOUTME: Assist route handler for the AI shopping assistant endpoint
// ABOUTME: Authenticates the caller, normalizes the payload, and runs the pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Assist routes
//!
//! A single endpoint accepts the conversation payload, requires a bearer
//! credential, and responds with the model provider's JSON payload plus the
//! `__web_search` metadata object. Failures map to `{"error": ...}` bodies
//! with 401 (auth), 400 (invalid input), or 500 (configuration/provider).

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use http::StatusCode;
use serde_json::Value;
use tracing::info;

use crate::{
    auth::{authenticate_bearer, AuthenticatedUser},
    errors::AppError,
    normalize::normalize_request,
    resources::ServerResources,
};

/// Assist route handlers
pub struct AssistRoutes;

impl AssistRoutes {
    /// Create all assist routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/assist", post(Self::handle_assist))
            .with_state(resources)
    }

    /// Extract and authenticate the caller from the authorization header
    fn authenticate(headers: &HeaderMap) -> Result<AuthenticatedUser, AppError> {
        let credential = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;
        authenticate_bearer(credential)
    }

    /// Run the assist pipeline for one conversation
    async fn handle_assist(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers)?;
        let request = normalize_request(&body)?;

        info!(
            user_id = %user.user_id,
            messages = request.messages.len(),
            web_search = request.web_search,
            "assist request accepted"
        );

        let payload = resources.pipeline.handle(request).await?;
        Ok((StatusCode::OK, Json(payload)).into_response())
    }
}
