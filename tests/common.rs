// ABOUTME: Shared test utilities and fake collaborators for integration tests
// ABOUTME: Provides in-memory search, catalog, and model fakes plus token helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

#![allow(missing_docs, clippy::unwrap_used)]
#![allow(dead_code)]

//! Shared test utilities for `bazaar_assist_server`
//!
//! Fake implementations of every outbound collaborator so pipeline and route
//! tests run deterministically without network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{json, Value};

use bazaar_assist_server::errors::{AppError, AppResult};
use bazaar_assist_server::llm::{GenerationRequest, ModelProvider};
use bazaar_assist_server::search::{SearchHit, SearchProvider};
use bazaar_assist_server::store::{
    CatalogStore, CategoryRow, ProductRow, ReviewSummary, Variant,
};

/// Build a bearer token with the given role and subject claims
pub fn make_token(role: &str, sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": sub, "role": role, "email": "shopper@example.com" })
            .to_string()
            .as_bytes(),
    );
    format!("{header}.{payload}.signature")
}

/// Search provider returning a fixed outcome
pub struct FakeSearchProvider {
    pub provider_name: &'static str,
    pub outcome: Result<Vec<SearchHit>, String>,
}

impl FakeSearchProvider {
    pub fn with_hits(name: &'static str, hits: Vec<SearchHit>) -> Arc<Self> {
        Arc::new(Self {
            provider_name: name,
            outcome: Ok(hits),
        })
    }

    pub fn failing(name: &'static str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            provider_name: name,
            outcome: Err(message.to_owned()),
        })
    }

    pub fn empty(name: &'static str) -> Arc<Self> {
        Self::with_hits(name, Vec::new())
    }
}

#[async_trait]
impl SearchProvider for FakeSearchProvider {
    fn name(&self) -> &'static str {
        self.provider_name
    }

    async fn search(&self, _query: &str, limit: usize) -> AppResult<Vec<SearchHit>> {
        match &self.outcome {
            Ok(hits) => Ok(hits.iter().take(limit).cloned().collect()),
            Err(message) => Err(AppError::internal(message.clone())),
        }
    }
}

/// Convenience search hit constructor
pub fn hit(title: &str, url: &str) -> SearchHit {
    SearchHit {
        title: title.to_owned(),
        url: url.to_owned(),
        snippet: Some(format!("snippet for {title}")),
    }
}

/// In-memory catalog store with per-lookup failure switches
#[derive(Default)]
pub struct FakeCatalogStore {
    pub categories: Vec<CategoryRow>,
    pub products: Vec<ProductRow>,
    pub category_names: HashMap<i64, String>,
    pub reviews: HashMap<i64, ReviewSummary>,
    pub variants: HashMap<i64, Vec<Variant>>,
    pub fail_products: bool,
    pub fail_reviews: bool,
    pub fail_variants: bool,
    pub fail_categories: bool,
}

#[async_trait]
impl CatalogStore for FakeCatalogStore {
    async fn matching_categories(&self, _terms: &[String]) -> AppResult<Vec<CategoryRow>> {
        if self.fail_categories {
            return Err(AppError::internal("categories down"));
        }
        Ok(self.categories.clone())
    }

    async fn matching_products(
        &self,
        _terms: &[String],
        _category_ids: &[i64],
    ) -> AppResult<Vec<ProductRow>> {
        if self.fail_products {
            return Err(AppError::internal("products down"));
        }
        Ok(self.products.clone())
    }

    async fn category_names(&self, _ids: &[i64]) -> AppResult<HashMap<i64, String>> {
        Ok(self.category_names.clone())
    }

    async fn review_summaries(
        &self,
        _product_ids: &[i64],
    ) -> AppResult<HashMap<i64, ReviewSummary>> {
        if self.fail_reviews {
            return Err(AppError::internal("reviews down"));
        }
        Ok(self.reviews.clone())
    }

    async fn variants(&self, _product_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Variant>>> {
        if self.fail_variants {
            return Err(AppError::internal("variants down"));
        }
        Ok(self.variants.clone())
    }
}

/// Model provider recording every request and returning a canned payload
pub struct RecordingModelProvider {
    pub requests: Mutex<Vec<GenerationRequest>>,
    pub response: Value,
    pub failure: Option<String>,
}

impl RecordingModelProvider {
    pub fn returning(response: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            response,
            failure: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            response: Value::Null,
            failure: Some(message.to_owned()),
        })
    }

    pub fn recorded(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for RecordingModelProvider {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Value> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.failure {
            Some(message) => Err(AppError::generation_failed(message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}

/// Product row builder with sensible defaults
pub fn product(id: i64, name: &str, price: f64) -> ProductRow {
    ProductRow {
        id,
        name: name.to_owned(),
        price,
        ..ProductRow::default()
    }
}

/// Variant row builder
pub fn variant(qty: i64, available: bool, attrs: &[(&str, &str)]) -> Variant {
    Variant {
        stock_quantity: qty,
        is_available: available,
        attributes: attrs
            .iter()
            .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
            .collect(),
        ..Variant::default()
    }
}
