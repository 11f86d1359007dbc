// ABOUTME: Fallback web search provider scraping the DuckDuckGo HTML results page
// ABOUTME: Best-effort parsing with a real HTML parser; degraded pages yield fewer results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Fallback search provider
//!
//! When the primary API is unavailable, results are scraped from the public
//! DuckDuckGo HTML endpoint. The page structure is outside our control, so
//! parsing is best-effort: anchors that do not match the expected shape are
//! skipped and a garbled page degrades to fewer (or zero) results instead of
//! failing the request.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::errors::{AppError, AppResult};
use crate::search::{SearchHit, SearchProvider};

/// Public HTML results endpoint
const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// DuckDuckGo HTML results scraper
#[derive(Debug, Clone)]
pub struct DuckDuckGoHtmlProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoHtmlProvider {
    /// Create a provider using the public HTML endpoint
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }

    /// Override the endpoint (used by tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoHtmlProvider {
    fn name(&self) -> &'static str {
        "duckduckgo-html"
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchHit>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .header("User-Agent", "Mozilla/5.0 (compatible; bazaar-assist)")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("fallback search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::internal(format!(
                "fallback search returned {status}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::internal(format!("fallback search body read failed: {e}")))?;

        Ok(parse_results_page(&html, limit))
    }
}

/// Extract results from a DuckDuckGo HTML results page
///
/// Each result block carries a `result__a` anchor (title + link) and a
/// sibling `result__snippet`. Anchors without usable text or href are
/// skipped.
#[must_use]
pub fn parse_results_page(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);

    let Ok(result_selector) = Selector::parse(".result") else {
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };
    let Ok(snippet_selector) = Selector::parse(".result__snippet") else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for result in document.select(&result_selector) {
        if hits.len() >= limit {
            break;
        }

        let Some(anchor) = result.select(&anchor_selector).next() else {
            continue;
        };

        let title = anchor.text().collect::<String>().trim().to_owned();
        let Some(url) = anchor.value().attr("href").and_then(resolve_result_url) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let snippet = result
            .select(&snippet_selector)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_owned())
            .filter(|s| !s.is_empty());

        hits.push(SearchHit {
            title,
            url,
            snippet,
        });
    }

    hits
}

/// Resolve a result href to its destination URL
///
/// The HTML endpoint wraps destinations in a `/l/?uddg=<encoded>` redirect.
fn resolve_result_url(href: &str) -> Option<String> {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return None;
    }

    let absolute = if trimmed.starts_with("//") {
        format!("https:{trimmed}")
    } else {
        trimmed.to_owned()
    };

    let Ok(parsed) = Url::parse(&absolute) else {
        // Relative hrefs and fragments are not usable destinations.
        return None;
    };

    if parsed.path().starts_with("/l/") {
        if let Some((_, destination)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
            return Some(destination.into_owned());
        }
    }

    Some(absolute)
}
