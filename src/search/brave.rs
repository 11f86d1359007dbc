// ABOUTME: Primary web search provider using the Brave Web Search API
// ABOUTME: Typed JSON client with per-call timeout and result validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Primary search provider
//!
//! Typed client for the Brave Web Search API. Results missing a title or URL
//! are dropped; the remainder are returned in provider relevance order.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::search::{retain_valid_hits, SearchHit, SearchProvider};

/// Default API endpoint
const DEFAULT_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

/// Per-call timeout; provider requests can hang without an explicit cap
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Brave Web Search API client
#[derive(Debug, Clone)]
pub struct BraveSearchProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: Option<String>,
}

impl BraveSearchProvider {
    /// Create a provider with the given API key
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }

    /// Override the API endpoint (used by tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl SearchProvider for BraveSearchProvider {
    fn name(&self) -> &'static str {
        "brave"
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchHit>> {
        if self.api_key.is_empty() {
            return Err(AppError::config("BAZAAR_SEARCH_API_KEY is not set"));
        }

        let count = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", count.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::internal(format!("search API returned {status}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("search response parse failed: {e}")))?;

        let hits = parsed
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                snippet: r.description,
            })
            .collect();

        Ok(retain_valid_hits(hits))
    }
}
