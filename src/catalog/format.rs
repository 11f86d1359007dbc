// ABOUTME: Catalog evidence block formatting with price, stock, and variant lines
// ABOUTME: Appends recommendation policy instructions and enforces the size cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Evidence formatting
//!
//! One line group per ranked candidate: effective price with the original
//! price and discount shown when discounted, an availability-gated stock
//! line, rating, category/brand/seller, variant and attribute summaries, a
//! deep link, and the first image. The block closes with fixed
//! recommendation-policy instructions and is hard-capped at 6000 characters.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::catalog::ranking::{
    aggregate_variant_stock, attribute_summary, available_quantity, is_in_stock, Candidate,
};

/// Hard cap on the evidence block, in characters
pub const MAX_EVIDENCE_CHARS: usize = 6000;

/// Fixed recommendation-policy instructions appended after the candidates
const RECOMMENDATION_POLICY: &str = "\
When recommending products:
- Always propose 3 options and explain briefly why each one fits the request.
- Mention the variant (colour/size) that matches what the customer asked for.
- Include the product link with every option.
- For \"best\" or \"top\" requests prefer higher rated, in-stock products with better value for money.";

/// Format ranked candidates into the catalog evidence block
///
/// Returns an empty string when there are no candidates.
#[must_use]
pub fn format_catalog_evidence(
    candidates: &[Candidate],
    category_names: &HashMap<i64, String>,
    link_base: &str,
) -> String {
    if candidates.is_empty() {
        return String::new();
    }

    let mut block = String::from("Live product catalog results (top matches for this request):\n");

    for (index, candidate) in candidates.iter().enumerate() {
        let product = &candidate.product;
        let _ = write!(
            block,
            "\n{}. {} - {}",
            index + 1,
            product.name,
            price_line(product.price, product.discount_percent)
        );

        if is_in_stock(product, &candidate.variants) {
            let quantity = available_quantity(product, &candidate.variants);
            let _ = write!(block, "\n   Stock: In stock ({quantity} available)");
        } else {
            block.push_str("\n   Stock: Sold out");
        }

        match &candidate.review {
            Some(review) => {
                let rating = review.average_rating.clamp(0.0, 5.0);
                let _ = write!(
                    block,
                    "\n   Rating: {rating:.1}/5 ({} reviews)",
                    review.review_count
                );
            }
            None => block.push_str("\n   Rating: No ratings yet"),
        }

        let mut origin = Vec::new();
        if let Some(name) = product.category_id.and_then(|id| category_names.get(&id)) {
            if !name.is_empty() {
                origin.push(format!("Category: {name}"));
            }
        }
        if let Some(brand) = product.brand.as_deref().filter(|b| !b.is_empty()) {
            origin.push(format!("Brand: {brand}"));
        }
        if let Some(seller) = product.seller_name.as_deref().filter(|s| !s.is_empty()) {
            origin.push(format!("Seller: {seller}"));
        }
        if !origin.is_empty() {
            let _ = write!(block, "\n   {}", origin.join(" | "));
        }

        if candidate.variants.is_empty() {
            block.push_str("\n   Has variants: No");
        } else {
            let stock = aggregate_variant_stock(&candidate.variants);
            let _ = write!(block, "\n   Has variants: Yes ({} options)", stock.total);

            let attributes = attribute_summary(&candidate.variants);
            if !attributes.is_empty() {
                let rendered: Vec<String> = attributes
                    .iter()
                    .map(|(name, values, more)| {
                        let suffix = if *more { ", …" } else { "" };
                        format!("{name}: {}{suffix}", values.join(", "))
                    })
                    .collect();
                let _ = write!(block, "\n   Options: {}", rendered.join("; "));
            }
            if let Some(example) = stock.combos.first() {
                let _ = write!(block, "\n   Example: {example}");
            }
        }

        let _ = write!(
            block,
            "\n   Link: {}/product/{}",
            link_base.trim_end_matches('/'),
            product.id
        );

        if let Some(image) = product.images.iter().find(|i| !i.trim().is_empty()) {
            let _ = write!(block, "\n   Image: {image}");
        }
        block.push('\n');
    }

    block.push('\n');
    block.push_str(RECOMMENDATION_POLICY);

    truncate_chars(block, MAX_EVIDENCE_CHARS)
}

/// Render the effective price with the original price when discounted
fn price_line(price: f64, discount_percent: f64) -> String {
    if discount_percent > 0.0 {
        let effective = round2(price * (1.0 - discount_percent / 100.0));
        format!("₹{effective:.2} (MRP ₹{price:.2}, {discount_percent:.0}% off)")
    } else {
        format!("₹{price:.2}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truncate to a character cap, never failing on overflow
fn truncate_chars(text: String, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text;
    }
    text.chars().take(cap).collect()
}
