// ABOUTME: Candidate scoring, variant stock aggregation, and attribute summaries
// ABOUTME: Implements availability-gated stock math for variant-bearing products
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Ranking and stock computation
//!
//! A candidate's score favors term coverage, sellable stock, discounts, and
//! ratings. Stock shown to the model is availability-gated: a variant with
//! quantity on hand but flagged unavailable counts as zero. For a
//! variant-bearing product the item-level quantity field is legacy data and
//! is ignored in favor of the variant aggregate.

use std::collections::BTreeMap;

use crate::store::{ProductRow, ReviewSummary, Variant};

/// Candidates kept after ranking
pub const TOP_CANDIDATES: usize = 6;

/// Distinct example combination labels per candidate
const MAX_COMBO_LABELS: usize = 4;

/// Distinct values listed per attribute
const MAX_ATTR_VALUES: usize = 6;

/// Attributes listed per candidate
const MAX_ATTRS: usize = 4;

/// A catalog product considered for recommendation in one request
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Product snapshot
    pub product: ProductRow,
    /// Review summary when one exists
    pub review: Option<ReviewSummary>,
    /// Variant rows belonging to the product
    pub variants: Vec<Variant>,
    /// Computed relevance score
    pub score: f64,
}

/// Availability-gated stock aggregate over a product's variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantStock {
    /// Total variant rows
    pub total: usize,
    /// Variants that are available and have quantity on hand
    pub sellable: usize,
    /// Sum of quantities over exactly the sellable variants
    pub sellable_quantity: i64,
    /// Up to four distinct human-readable combination labels
    pub combos: Vec<String>,
}

/// Score one candidate against the extracted terms
///
/// Weights: 3 per matched term, 5 for an in-stock status marker, 2 for
/// item-level quantity on hand, 1 for an active discount, plus the rating
/// clamped into [0, 5] when a review summary exists.
#[must_use]
pub fn score_candidate(
    product: &ProductRow,
    review: Option<&ReviewSummary>,
    terms: &[String],
) -> f64 {
    let haystack = format!(
        "{} {} {}",
        product.name,
        product.description.as_deref().unwrap_or_default(),
        product.brand.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    let term_hits = terms.iter().filter(|t| haystack.contains(t.as_str())).count();

    let mut score = 3.0 * term_hits as f64;
    if has_in_stock_status(product) {
        score += 5.0;
    }
    if product.stock_quantity > 0 {
        score += 2.0;
    }
    if product.discount_percent > 0.0 {
        score += 1.0;
    }
    if let Some(summary) = review {
        score += summary.average_rating.clamp(0.0, 5.0);
    }
    score
}

/// Sort candidates by score descending and keep the best
///
/// The sort is stable: equal scores preserve the candidate fetch order
/// (most recent first).
#[must_use]
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(TOP_CANDIDATES);
    candidates
}

/// Whether the item-level status marker says "in stock"
fn has_in_stock_status(product: &ProductRow) -> bool {
    product
        .stock_status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("in_stock") || s.eq_ignore_ascii_case("in stock"))
}

/// Aggregate availability-gated stock over a product's variants
#[must_use]
pub fn aggregate_variant_stock(variants: &[Variant]) -> VariantStock {
    let mut sellable = 0;
    let mut sellable_quantity = 0;
    let mut combos: Vec<String> = Vec::new();

    for variant in variants {
        if variant.is_available && variant.stock_quantity > 0 {
            sellable += 1;
            sellable_quantity += variant.stock_quantity;
        }
        if combos.len() < MAX_COMBO_LABELS {
            if let Some(label) = combination_label(variant) {
                if !combos.contains(&label) {
                    combos.push(label);
                }
            }
        }
    }

    VariantStock {
        total: variants.len(),
        sellable,
        sellable_quantity,
        combos,
    }
}

/// Whether the candidate is sellable right now
///
/// A simple product is in stock iff its own quantity is positive. A
/// variant-bearing product is in stock iff at least one variant is both
/// available and has quantity on hand.
#[must_use]
pub fn is_in_stock(product: &ProductRow, variants: &[Variant]) -> bool {
    if variants.is_empty() {
        product.stock_quantity > 0
    } else {
        variants
            .iter()
            .any(|v| v.is_available && v.stock_quantity > 0)
    }
}

/// Quantity reported to the model
#[must_use]
pub fn available_quantity(product: &ProductRow, variants: &[Variant]) -> i64 {
    if variants.is_empty() {
        product.stock_quantity.max(0)
    } else {
        aggregate_variant_stock(variants).sellable_quantity
    }
}

/// Human-readable label for one variant's attribute combination
///
/// Attribute names sort alphabetically so identical combinations always
/// produce identical labels.
#[must_use]
pub fn combination_label(variant: &Variant) -> Option<String> {
    if variant.attributes.is_empty() {
        return None;
    }
    let mut pairs = variant.attributes.clone();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Some(
        pairs
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Distinct values observed per attribute across all variants
///
/// Returns up to [`MAX_ATTRS`] attributes in name order; each carries up to
/// [`MAX_ATTR_VALUES`] values in first-seen order plus a flag marking that
/// more values exist.
#[must_use]
pub fn attribute_summary(variants: &[Variant]) -> Vec<(String, Vec<String>, bool)> {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for variant in variants {
        for (name, value) in &variant.attributes {
            let values = grouped.entry(name.as_str()).or_default();
            if !values.contains(&value.as_str()) {
                values.push(value.as_str());
            }
        }
    }

    grouped
        .into_iter()
        .take(MAX_ATTRS)
        .map(|(name, values)| {
            let truncated = values.len() > MAX_ATTR_VALUES;
            let kept = values
                .into_iter()
                .take(MAX_ATTR_VALUES)
                .map(ToOwned::to_owned)
                .collect();
            (name.to_owned(), kept, truncated)
        })
        .collect()
}
