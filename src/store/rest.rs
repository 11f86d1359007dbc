// ABOUTME: PostgREST-style catalog store client over the data platform's REST interface
// ABOUTME: Builds ilike/or/in filters and flattens nested variant attribute joins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! REST catalog store
//!
//! The storefront's managed data platform exposes tables through a
//! PostgREST-style query interface: `ilike` substring filters, `or=()`
//! disjunctions, `in.()` id lists, and nested `select=` embeds for the
//! variant to attribute-value joins. Requests authenticate with the
//! privileged service key.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::store::{CatalogStore, CategoryRow, ProductRow, ReviewSummary, Variant};

/// Category match query cap
const CATEGORY_LIMIT: usize = 10;

/// Candidate fetch cap
const CANDIDATE_LIMIT: usize = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// PostgREST catalog client
#[derive(Debug, Clone)]
pub struct RestCatalogStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

/// Wire shape of a variant row with its nested attribute-value join
#[derive(Debug, Deserialize)]
struct VariantWire {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    product_id: i64,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    stock_quantity: i64,
    #[serde(default = "default_true")]
    is_available: bool,
    #[serde(default)]
    product_variant_values: Vec<VariantValueWire>,
}

#[derive(Debug, Deserialize)]
struct VariantValueWire {
    #[serde(default)]
    attribute_values: Option<AttributeValueWire>,
}

#[derive(Debug, Deserialize)]
struct AttributeValueWire {
    #[serde(default)]
    value: String,
    #[serde(default)]
    attributes: Option<AttributeWire>,
}

#[derive(Debug, Deserialize)]
struct AttributeWire {
    #[serde(default)]
    name: String,
}

const fn default_true() -> bool {
    true
}

impl RestCatalogStore {
    /// Create a client for the data store at `base_url`
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String, service_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_key,
        }
    }

    /// Execute one table query and deserialize the row list
    async fn query_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(String, String)],
    ) -> AppResult<Vec<T>> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("catalog query failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::internal(format!(
                "catalog query for {table} returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("catalog rows parse failed: {e}")))
    }
}

/// Build a PostgREST `or=()` disjunction of ilike filters
///
/// Terms carrying filter syntax characters are skipped so a query can never
/// break out of the disjunction.
fn ilike_disjunction(fields: &[&str], terms: &[String]) -> Option<String> {
    let mut clauses = Vec::new();
    for term in terms {
        if term.contains([',', '(', ')', '.']) || term.is_empty() {
            continue;
        }
        for field in fields {
            clauses.push(format!("{field}.ilike.*{term}*"));
        }
    }
    if clauses.is_empty() {
        None
    } else {
        Some(format!("({})", clauses.join(",")))
    }
}

/// Build a PostgREST `in.()` id list filter
fn id_list(ids: &[i64]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({joined})")
}

#[async_trait]
impl CatalogStore for RestCatalogStore {
    async fn matching_categories(&self, terms: &[String]) -> AppResult<Vec<CategoryRow>> {
        let Some(filter) = ilike_disjunction(&["name"], terms) else {
            return Ok(Vec::new());
        };

        self.query_rows(
            "categories",
            &[
                ("select".to_owned(), "id,name".to_owned()),
                ("is_active".to_owned(), "eq.true".to_owned()),
                ("or".to_owned(), filter),
                ("order".to_owned(), "sort_order.asc".to_owned()),
                ("limit".to_owned(), CATEGORY_LIMIT.to_string()),
            ],
        )
        .await
    }

    async fn matching_products(
        &self,
        terms: &[String],
        category_ids: &[i64],
    ) -> AppResult<Vec<ProductRow>> {
        let fields = ["name", "description", "brand", "seller_name"];
        let Some(filter) = ilike_disjunction(&fields, terms) else {
            return Ok(Vec::new());
        };

        let mut params = vec![
            (
                "select".to_owned(),
                "id,name,description,price,discount_percent,images,stock_status,stock_quantity,category_id,brand,seller_name"
                    .to_owned(),
            ),
            ("or".to_owned(), filter),
            ("order".to_owned(), "created_at.desc".to_owned()),
            ("limit".to_owned(), CANDIDATE_LIMIT.to_string()),
        ];
        if !category_ids.is_empty() {
            params.push(("category_id".to_owned(), id_list(category_ids)));
        }

        let mut with_active = params.clone();
        with_active.push(("is_active".to_owned(), "eq.true".to_owned()));

        match self.query_rows("products", &with_active).await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                // Some deployments predate the is_active column; the same
                // query without the filter is still a usable candidate set.
                debug!("candidate fetch with active filter failed, retrying without: {e}");
                self.query_rows("products", &params).await
            }
        }
    }

    async fn category_names(&self, ids: &[i64]) -> AppResult<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<CategoryRow> = self
            .query_rows(
                "categories",
                &[
                    ("select".to_owned(), "id,name".to_owned()),
                    ("id".to_owned(), id_list(ids)),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(|c| (c.id, c.name)).collect())
    }

    async fn review_summaries(
        &self,
        product_ids: &[i64],
    ) -> AppResult<HashMap<i64, ReviewSummary>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<ReviewSummary> = self
            .query_rows(
                "product_review_summary",
                &[
                    (
                        "select".to_owned(),
                        "product_id,average_rating,review_count".to_owned(),
                    ),
                    ("product_id".to_owned(), id_list(product_ids)),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(|r| (r.product_id, r)).collect())
    }

    async fn variants(&self, product_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Variant>>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<VariantWire> = self
            .query_rows(
                "product_variants",
                &[
                    (
                        "select".to_owned(),
                        "id,product_id,price,stock_quantity,is_available,product_variant_values(attribute_values(value,attributes(name)))"
                            .to_owned(),
                    ),
                    ("product_id".to_owned(), id_list(product_ids)),
                ],
            )
            .await?;

        let mut grouped: HashMap<i64, Vec<Variant>> = HashMap::new();
        for wire in rows {
            grouped
                .entry(wire.product_id)
                .or_default()
                .push(flatten_variant(wire));
        }
        Ok(grouped)
    }
}

/// Flatten a wire variant and its nested attribute join into a domain row
fn flatten_variant(wire: VariantWire) -> Variant {
    let attributes = wire
        .product_variant_values
        .into_iter()
        .filter_map(|v| v.attribute_values)
        .filter_map(|av| {
            let name = av.attributes.map(|a| a.name).unwrap_or_default();
            if name.is_empty() || av.value.is_empty() {
                None
            } else {
                Some((name, av.value))
            }
        })
        .collect();

    Variant {
        id: wire.id,
        product_id: wire.product_id,
        price: wire.price,
        stock_quantity: wire.stock_quantity,
        is_available: wire.is_available,
        attributes,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn disjunction_covers_every_field_and_term() {
        let filter = ilike_disjunction(
            &["name", "brand"],
            &["red".to_owned(), "shoes".to_owned()],
        )
        .unwrap();
        assert_eq!(
            filter,
            "(name.ilike.*red*,brand.ilike.*red*,name.ilike.*shoes*,brand.ilike.*shoes*)"
        );
    }

    #[test]
    fn terms_with_filter_syntax_are_skipped() {
        assert!(ilike_disjunction(&["name"], &["a,b".to_owned()]).is_none());
        assert!(ilike_disjunction(&["name"], &["(x)".to_owned()]).is_none());
        let filter = ilike_disjunction(&["name"], &["ok".to_owned(), "bad.dot".to_owned()]);
        assert_eq!(filter.unwrap(), "(name.ilike.*ok*)");
    }

    #[test]
    fn id_list_formats_postgrest_in_filter() {
        assert_eq!(id_list(&[1, 2, 3]), "in.(1,2,3)");
    }

    #[test]
    fn variant_join_flattens_into_attribute_pairs() {
        let raw = r#"{
            "id": 7,
            "product_id": 3,
            "price": 199.0,
            "stock_quantity": 4,
            "is_available": true,
            "product_variant_values": [
                { "attribute_values": { "value": "Red", "attributes": { "name": "Color" } } },
                { "attribute_values": { "value": "M", "attributes": { "name": "Size" } } },
                { "attribute_values": null }
            ]
        }"#;
        let wire: VariantWire = serde_json::from_str(raw).unwrap();
        let variant = flatten_variant(wire);
        assert_eq!(variant.id, 7);
        assert_eq!(
            variant.attributes,
            vec![
                ("Color".to_owned(), "Red".to_owned()),
                ("Size".to_owned(), "M".to_owned())
            ]
        );
    }

    #[test]
    fn missing_fields_deserialize_as_absent() {
        let wire: VariantWire = serde_json::from_str(r#"{ "id": 1, "product_id": 2 }"#).unwrap();
        assert!(wire.is_available);
        assert_eq!(wire.stock_quantity, 0);
        assert!(wire.product_variant_values.is_empty());

        let product: ProductRow = serde_json::from_str(r#"{ "id": 9, "name": "Lamp" }"#).unwrap();
        assert_eq!(product.stock_quantity, 0);
        assert!(product.images.is_empty());
        assert!(product.brand.is_none());
    }
}
