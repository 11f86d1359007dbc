// ABOUTME: Catalog data store abstraction with typed row records
// ABOUTME: Defines the read-only query surface used to gather catalog evidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Catalog store
//!
//! All catalog reads go through the [`CatalogStore`] trait so the pipeline is
//! deterministic under test. Rows are explicit typed records; fields the data
//! store fails to return deserialize as their defaults and downstream logic
//! treats them as absent rather than crashing.

pub mod rest;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppResult;

pub use rest::RestCatalogStore;

/// A product category
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CategoryRow {
    /// Category identifier
    pub id: i64,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Read-only product snapshot fetched per request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRow {
    /// Product identifier
    pub id: i64,
    /// Product name
    #[serde(default)]
    pub name: String,
    /// Long description when present
    #[serde(default)]
    pub description: Option<String>,
    /// List price
    #[serde(default)]
    pub price: f64,
    /// Active discount percentage, zero when none
    #[serde(default)]
    pub discount_percent: f64,
    /// Image URLs in display order
    #[serde(default)]
    pub images: Vec<String>,
    /// Item-level stock status marker (e.g. `in_stock`)
    #[serde(default)]
    pub stock_status: Option<String>,
    /// Item-level stock quantity; superseded by variant stock when variants exist
    #[serde(default)]
    pub stock_quantity: i64,
    /// Category identifier when assigned
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Brand name when present
    #[serde(default)]
    pub brand: Option<String>,
    /// Seller display name when present
    #[serde(default)]
    pub seller_name: Option<String>,
}

/// Aggregated review figures for one product
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSummary {
    /// Product the summary belongs to
    pub product_id: i64,
    /// Mean rating
    #[serde(default)]
    pub average_rating: f64,
    /// Number of reviews behind the mean
    #[serde(default)]
    pub review_count: i64,
}

/// A purchasable configuration of a product
#[derive(Debug, Clone, Default)]
pub struct Variant {
    /// Variant identifier
    pub id: i64,
    /// Owning product
    pub product_id: i64,
    /// Variant-specific price when it differs from the product
    pub price: Option<f64>,
    /// Units on hand
    pub stock_quantity: i64,
    /// Whether the variant can currently be sold
    pub is_available: bool,
    /// Attribute name/value pairs describing the configuration
    pub attributes: Vec<(String, String)>,
}

/// Read-only catalog query surface
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Active categories whose name matches any of `terms`, best first
    async fn matching_categories(&self, terms: &[String]) -> AppResult<Vec<CategoryRow>>;

    /// Active products matching any term across name/description/brand/seller,
    /// optionally restricted to `category_ids`, most recent first
    async fn matching_products(
        &self,
        terms: &[String],
        category_ids: &[i64],
    ) -> AppResult<Vec<ProductRow>>;

    /// Category display names keyed by id
    async fn category_names(&self, ids: &[i64]) -> AppResult<HashMap<i64, String>>;

    /// Review summaries keyed by product id; absence means "no ratings yet"
    async fn review_summaries(&self, product_ids: &[i64]) -> AppResult<HashMap<i64, ReviewSummary>>;

    /// Variant rows with attribute pairs, grouped by product id
    async fn variants(&self, product_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Variant>>>;
}
