// ABOUTME: Web search provider abstraction and ordered fallback chain
// ABOUTME: Formats top results as an evidence block for conversation injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Web search orchestration
//!
//! Search capability sits behind the [`SearchProvider`] trait with two
//! implementations: a typed API client (primary) and a best-effort HTML
//! parser over a public results page (secondary). A [`SearchChain`] tries
//! providers in order and reports which tier answered. Search failures never
//! fail the request; they degrade to "no search context".

pub mod brave;
pub mod duckduckgo;

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::AppResult;

pub use brave::BraveSearchProvider;
pub use duckduckgo::DuckDuckGoHtmlProvider;

/// Maximum number of results kept from any provider
pub const MAX_RESULTS: usize = 5;

/// One web search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result title, non-empty
    pub title: String,
    /// Result URL, non-empty
    pub url: String,
    /// Short snippet when the provider supplies one
    pub snippet: Option<String>,
}

/// Which provider tier produced the search evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTier {
    /// The typed API provider answered
    Primary,
    /// The HTML fallback answered
    Secondary,
    /// No provider produced results
    None,
}

impl SearchTier {
    /// Label used in response metadata
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::None => "none",
        }
    }
}

/// Outcome of one web search attempt across the chain
#[derive(Debug, Clone)]
pub struct WebSearchOutcome {
    /// Which tier answered
    pub tier: SearchTier,
    /// Results in provider order, capped at [`MAX_RESULTS`]
    pub hits: Vec<SearchHit>,
}

impl WebSearchOutcome {
    /// Outcome representing "no search context"
    #[must_use]
    pub const fn none() -> Self {
        Self {
            tier: SearchTier::None,
            hits: Vec::new(),
        }
    }

    /// True when at least one result was gathered
    #[must_use]
    pub fn used(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// A web search capability
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Search for `query`, returning at most `limit` validated results
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchHit>>;
}

/// Ordered provider fallback chain
pub struct SearchChain {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl SearchChain {
    /// Build a chain that tries `providers` in order
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    /// Run the fallback chain for `query`
    ///
    /// An empty query is a no-op. A provider error or zero results moves on
    /// to the next provider; when every provider comes up empty the outcome
    /// is [`SearchTier::None`] and the request continues without evidence.
    pub async fn search(&self, query: &str) -> WebSearchOutcome {
        if query.trim().is_empty() {
            return WebSearchOutcome::none();
        }

        for (index, provider) in self.providers.iter().enumerate() {
            match provider.search(query, MAX_RESULTS).await {
                Ok(hits) if !hits.is_empty() => {
                    debug!(
                        provider = provider.name(),
                        results = hits.len(),
                        "web search answered"
                    );
                    let tier = if index == 0 {
                        SearchTier::Primary
                    } else {
                        SearchTier::Secondary
                    };
                    let mut hits = hits;
                    hits.truncate(MAX_RESULTS);
                    return WebSearchOutcome { tier, hits };
                }
                Ok(_) => {
                    debug!(provider = provider.name(), "web search returned no results");
                }
                Err(e) => {
                    warn!(provider = provider.name(), "web search failed: {e}");
                }
            }
        }

        WebSearchOutcome::none()
    }
}

/// Drop results lacking a title or URL, keeping provider order
#[must_use]
pub fn retain_valid_hits(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.into_iter()
        .filter(|h| !h.title.trim().is_empty() && !h.url.trim().is_empty())
        .collect()
}

/// Format search results as an evidence block
///
/// Returns an empty string when there are no results.
#[must_use]
pub fn format_search_evidence(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return String::new();
    }

    let mut block = format!("Web search results for \"{query}\":\n");
    for (index, hit) in hits.iter().enumerate() {
        let _ = write!(block, "\n{}. {}\n   {}", index + 1, hit.title, hit.url);
        if let Some(snippet) = hit.snippet.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let _ = write!(block, "\n   {snippet}");
        }
    }
    block.push_str(
        "\n\nUse these results when they help answer the question, and mention the source link when you rely on one.",
    );
    block
}
