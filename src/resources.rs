// ABOUTME: Shared per-process resources wired from configuration at startup
// ABOUTME: Builds the search chain, catalog store, model client, and pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Server resources
//!
//! All collaborators are constructed once at startup around a shared HTTP
//! client and handed to route handlers as `Arc<ServerResources>`. The
//! pipeline itself stays stateless; resources only carry configuration and
//! connection pools.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::CatalogContextBuilder;
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::GeminiClient;
use crate::pipeline::AssistPipeline;
use crate::search::{BraveSearchProvider, DuckDuckGoHtmlProvider, SearchChain, SearchProvider};
use crate::store::{CatalogStore, CategoryRow, ProductRow, RestCatalogStore, ReviewSummary, Variant};

/// Shared resources for all route handlers
pub struct ServerResources {
    /// Loaded configuration
    pub config: ServerConfig,
    /// The assist pipeline with all collaborators wired
    pub pipeline: AssistPipeline,
}

impl ServerResources {
    /// Create resources around an already-built pipeline
    ///
    /// Used by tests to inject fake collaborators behind the route layer.
    #[must_use]
    pub fn new(config: ServerConfig, pipeline: AssistPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Wire all collaborators from configuration
    #[must_use]
    pub fn from_config(config: ServerConfig) -> Self {
        let client = reqwest::Client::new();

        let providers: Vec<Arc<dyn SearchProvider>> = vec![
            Arc::new(BraveSearchProvider::new(
                client.clone(),
                config.search_api_key.clone().unwrap_or_default(),
            )),
            Arc::new(DuckDuckGoHtmlProvider::new(client.clone())),
        ];
        let search = SearchChain::new(providers);

        let store: Arc<dyn CatalogStore> = match (&config.store_url, &config.store_service_key) {
            (Some(url), Some(key)) => Arc::new(RestCatalogStore::new(
                client.clone(),
                url.clone(),
                key.clone(),
            )),
            _ => Arc::new(DisabledCatalogStore),
        };
        let catalog = CatalogContextBuilder::new(store, config.product_link_base.clone());

        let model = Arc::new(GeminiClient::new(
            client,
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
        ));

        Self {
            config,
            pipeline: AssistPipeline::new(search, catalog, model),
        }
    }
}

/// Catalog store used when the data store is not configured
///
/// Every lookup yields nothing, so the catalog stage quietly contributes no
/// evidence instead of erroring on every request.
struct DisabledCatalogStore;

#[async_trait]
impl CatalogStore for DisabledCatalogStore {
    async fn matching_categories(&self, _terms: &[String]) -> AppResult<Vec<CategoryRow>> {
        Ok(Vec::new())
    }

    async fn matching_products(
        &self,
        _terms: &[String],
        _category_ids: &[i64],
    ) -> AppResult<Vec<ProductRow>> {
        Ok(Vec::new())
    }

    async fn category_names(&self, _ids: &[i64]) -> AppResult<HashMap<i64, String>> {
        Ok(HashMap::new())
    }

    async fn review_summaries(
        &self,
        _product_ids: &[i64],
    ) -> AppResult<HashMap<i64, ReviewSummary>> {
        Ok(HashMap::new())
    }

    async fn variants(&self, _product_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Variant>>> {
        Ok(HashMap::new())
    }
}
