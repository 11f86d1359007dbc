// ABOUTME: Catalog context builder orchestrating trigger, retrieval, ranking, formatting
// ABOUTME: Degrades gracefully on enrichment failures and never fails the request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Catalog context builder
//!
//! The most intricate pipeline stage. For a shopping query it extracts
//! terms, matches categories, fetches and enriches candidate products,
//! scores and ranks them, and formats a bounded evidence block. Every
//! failure inside this stage degrades: a failed enrichment loses only that
//! enrichment, a failed candidate fetch loses the whole block, and the
//! request itself always continues.

pub mod format;
pub mod ranking;
pub mod terms;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::store::{CatalogStore, ProductRow};

pub use format::{format_catalog_evidence, MAX_EVIDENCE_CHARS};
pub use ranking::{rank_candidates, score_candidate, Candidate};
pub use terms::{extract_terms, has_purchase_vocabulary, should_skip_query};

/// Terms used for category matching
const CATEGORY_TERM_LIMIT: usize = 6;

/// Matched categories kept for candidate restriction
const MATCHED_CATEGORY_LIMIT: usize = 3;

/// Builds catalog evidence blocks for shopping queries
pub struct CatalogContextBuilder {
    store: Arc<dyn CatalogStore>,
    link_base: String,
}

impl CatalogContextBuilder {
    /// Create a builder over the given store
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, link_base: String) -> Self {
        Self { store, link_base }
    }

    /// Build the catalog evidence block for `query`
    ///
    /// Returns `None` when the query does not warrant catalog evidence or
    /// when no candidates could be fetched.
    pub async fn build_evidence(&self, query: &str) -> Option<String> {
        if should_skip_query(query) {
            debug!("catalog context skipped: query not shopping-shaped");
            return None;
        }

        let terms = extract_terms(query);
        if terms.is_empty() && !has_purchase_vocabulary(query) {
            debug!("catalog context skipped: no usable terms");
            return None;
        }

        let category_ids = self.matched_category_ids(&terms).await;

        let products = match self.store.matching_products(&terms, &category_ids).await {
            Ok(products) => products,
            Err(e) => {
                warn!("candidate fetch failed, skipping catalog context: {e}");
                return None;
            }
        };
        if products.is_empty() {
            debug!("catalog context skipped: no matching products");
            return None;
        }

        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();

        // Enrichment lookups are optional; a failed one loses only itself.
        let category_names = self
            .store
            .category_names(&collect_category_ids(&products))
            .await
            .unwrap_or_else(|e| {
                warn!("category name lookup failed: {e}");
                HashMap::new()
            });
        let mut reviews = self.store.review_summaries(&ids).await.unwrap_or_else(|e| {
            warn!("review summary lookup failed: {e}");
            HashMap::new()
        });
        let mut variants = self.store.variants(&ids).await.unwrap_or_else(|e| {
            warn!("variant lookup failed: {e}");
            HashMap::new()
        });

        let candidates: Vec<Candidate> = products
            .into_iter()
            .map(|product| {
                let review = reviews.remove(&product.id);
                let product_variants = variants.remove(&product.id).unwrap_or_default();
                let score = score_candidate(&product, review.as_ref(), &terms);
                Candidate {
                    product,
                    review,
                    variants: product_variants,
                    score,
                }
            })
            .collect();

        let ranked = rank_candidates(candidates);
        debug!(
            terms = terms.len(),
            candidates = ranked.len(),
            "catalog context built"
        );

        let block = format_catalog_evidence(&ranked, &category_names, &self.link_base);
        if block.is_empty() {
            None
        } else {
            Some(block)
        }
    }

    /// Match categories for the leading terms and keep the best few ids
    async fn matched_category_ids(&self, terms: &[String]) -> Vec<i64> {
        let leading: Vec<String> = terms.iter().take(CATEGORY_TERM_LIMIT).cloned().collect();
        if leading.is_empty() {
            return Vec::new();
        }
        match self.store.matching_categories(&leading).await {
            Ok(categories) => categories
                .into_iter()
                .take(MATCHED_CATEGORY_LIMIT)
                .map(|c| c.id)
                .collect(),
            Err(e) => {
                warn!("category match failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Distinct category ids referenced by the candidate set
fn collect_category_ids(products: &[ProductRow]) -> Vec<i64> {
    let mut ids: Vec<i64> = products.iter().filter_map(|p| p.category_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
