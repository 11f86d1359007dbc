// ABOUTME: Route-level tests for the assist endpoint status codes and auth flow
// ABOUTME: Exercises the axum router with fake collaborators and no network access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use bazaar_assist_server::catalog::CatalogContextBuilder;
use bazaar_assist_server::config::ServerConfig;
use bazaar_assist_server::pipeline::AssistPipeline;
use bazaar_assist_server::resources::ServerResources;
use bazaar_assist_server::routes::AssistRoutes;
use bazaar_assist_server::search::SearchChain;

use common::{make_token, FakeCatalogStore, FakeSearchProvider, RecordingModelProvider};

fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        gemini_api_key: Some("test-key".to_owned()),
        gemini_base_url: "https://model.invalid".to_owned(),
        search_api_key: None,
        store_url: None,
        store_service_key: None,
        product_link_base: "https://bazaar.example.com".to_owned(),
    }
}

fn app_with_model(model: Arc<RecordingModelProvider>) -> Router {
    let pipeline = AssistPipeline::new(
        SearchChain::new(vec![FakeSearchProvider::empty("primary")]),
        CatalogContextBuilder::new(
            Arc::new(FakeCatalogStore::default()),
            "https://bazaar.example.com".to_owned(),
        ),
        model,
    );
    AssistRoutes::routes(Arc::new(ServerResources::new(test_config(), pipeline)))
}

fn assist_request(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/assist")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn valid_request_returns_provider_payload_with_metadata() {
    let model = RecordingModelProvider::returning(json!({ "candidates": ["answer"] }));
    let app = app_with_model(Arc::clone(&model));

    let token = make_token("authenticated", "user-1");
    let body = json!({ "messages": [{ "role": "user", "content": "qwerty asdf" }] });
    let response = app.oneshot(assist_request(Some(&token), &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(payload["candidates"][0], "answer");
    assert_eq!(payload["__web_search"]["provider"], "none");
    assert_eq!(model.recorded().len(), 1);
}

#[tokio::test]
async fn anon_role_is_unauthorized_and_runs_no_stage() {
    let model = RecordingModelProvider::returning(json!({}));
    let app = app_with_model(Arc::clone(&model));

    let token = make_token("anon", "user-1");
    let body = json!({ "messages": [{ "role": "user", "content": "hi there friend" }] });
    let response = app.oneshot(assist_request(Some(&token), &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = body_json(response).await;
    assert!(payload["error"].as_str().unwrap().contains("authenticated"));
    assert!(model.recorded().is_empty());
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let model = RecordingModelProvider::returning(json!({}));
    let app = app_with_model(model);

    let body = json!({ "messages": [{ "role": "user", "content": "hello world" }] });
    let response = app.oneshot(assist_request(None, &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_message_list_is_invalid_input() {
    let model = RecordingModelProvider::returning(json!({}));
    let app = app_with_model(Arc::clone(&model));

    let token = make_token("authenticated", "user-1");
    let body = json!({ "messages": [] });
    let response = app.oneshot(assist_request(Some(&token), &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert!(payload["error"].is_string());
    assert!(model.recorded().is_empty());
}

#[tokio::test]
async fn model_provider_failure_maps_to_internal_error() {
    let model = RecordingModelProvider::failing("provider exploded");
    let app = app_with_model(model);

    let token = make_token("authenticated", "user-1");
    let body = json!({ "messages": [{ "role": "user", "content": "qwerty asdf" }] });
    let response = app.oneshot(assist_request(Some(&token), &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "provider exploded");
}
