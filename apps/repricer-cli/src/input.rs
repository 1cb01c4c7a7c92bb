//! # GraphQL Page Input
//!
//! Reads exported Admin API responses and flattens them into
//! [`VariantSnapshot`]s for the engine.
//!
//! ## Accepted Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Price passes (force-cents / round-tiers)                               │
//! │                                                                         │
//! │  { "data": { "productVariants": {                                       │
//! │      "pageInfo": { "hasNextPage", "endCursor" },                        │
//! │      "edges": [ { "node": { id, price, compareAtPrice,                  │
//! │                              product { id } } } ] } } }                 │
//! │                                                                         │
//! │  Collection discount                                                    │
//! │                                                                         │
//! │  { "data": { "collection": { "id", "products": {                        │
//! │      "pageInfo": {...},                                                 │
//! │      "edges": [ { "node": { id, "variants": {                           │
//! │          "edges": [ { "node": { id, price, compareAtPrice } } ]         │
//! │      } } } ] } } } }                                                    │
//! │                                                                         │
//! │  A file holds one page object or an array of pages, in order.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing nodes and fields are tolerated here; the planner decides what a
//! half-filled record means.

use std::path::Path;

use repricer_core::VariantSnapshot;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Envelope and Connection
// =============================================================================

/// One GraphQL response as returned by the Admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,

    #[serde(default = "Vec::new")]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

/// Relay-style connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<N>>,

    #[serde(default = "Option::default")]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<N> {
    #[serde(default = "Option::default")]
    pub node: Option<N>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,

    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl<N> Connection<N> {
    fn nodes(&self) -> impl Iterator<Item = &N> {
        self.edges.iter().filter_map(|edge| edge.node.as_ref())
    }

    fn has_next_page(&self) -> bool {
        self.page_info.as_ref().is_some_and(|info| info.has_next_page)
    }
}

// =============================================================================
// Node Types
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: Option<String>,
    pub price: Option<String>,
    pub compare_at_price: Option<String>,
    pub product: Option<ProductRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRef {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductNode {
    pub id: Option<String>,
    pub variants: Option<Connection<VariantNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionNode {
    pub id: Option<String>,
    pub products: Option<Connection<ProductNode>>,
}

/// `data` of a `productVariants` page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsData {
    pub product_variants: Option<Connection<VariantNode>>,
}

/// `data` of a `collection { products }` page.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionData {
    pub collection: Option<CollectionNode>,
}

// =============================================================================
// Loading
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Reads a page file (single page or array of pages).
pub fn load_pages<T: DeserializeOwned>(path: &Path) -> CliResult<Vec<GraphqlResponse<T>>> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pages(&contents).map_err(|source| CliError::InvalidPage {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses page JSON (single page or array of pages).
pub fn parse_pages<T: DeserializeOwned>(
    json: &str,
) -> Result<Vec<GraphqlResponse<T>>, serde_json::Error> {
    let pages = match serde_json::from_str::<OneOrMany<GraphqlResponse<T>>>(json)? {
        OneOrMany::Many(pages) => pages,
        OneOrMany::One(page) => vec![page],
    };
    debug!(pages = pages.len(), "Parsed GraphQL pages");
    Ok(pages)
}

fn warn_on_errors<T>(index: usize, page: &GraphqlResponse<T>) {
    for error in &page.errors {
        warn!(page = index, message = %error.message, "GraphQL page carries an error");
    }
}

// =============================================================================
// Flattening
// =============================================================================

/// Flattens `productVariants` pages into snapshots, in page order.
pub fn variant_snapshots(pages: &[GraphqlResponse<VariantsData>]) -> Vec<VariantSnapshot> {
    let mut snapshots = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        warn_on_errors(index, page);
        let Some(connection) = page.data.as_ref().and_then(|d| d.product_variants.as_ref()) else {
            warn!(page = index, "Page has no productVariants connection");
            continue;
        };

        snapshots.extend(connection.nodes().map(|node| VariantSnapshot {
            variant_id: node.id.clone(),
            product_id: node.product.as_ref().and_then(|p| p.id.clone()),
            price: node.price.clone(),
            compare_at_price: node.compare_at_price.clone(),
        }));

        if index + 1 == pages.len() && connection.has_next_page() {
            warn!("Last page reports more results; export may be incomplete");
        }
    }

    snapshots
}

/// Flattens collection product pages into snapshots, in page order.
///
/// Products without an id are dropped without being counted, since no
/// write can target them. Pages for another collection are ignored.
pub fn collection_snapshots(
    pages: &[GraphqlResponse<CollectionData>],
    collection_id: &str,
) -> Vec<VariantSnapshot> {
    let mut snapshots = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        warn_on_errors(index, page);
        let Some(collection) = page.data.as_ref().and_then(|d| d.collection.as_ref()) else {
            warn!(page = index, "Page has no collection");
            continue;
        };

        if let Some(ref id) = collection.id {
            if id != collection_id {
                warn!(page = index, found = %id, expected = %collection_id, "Skipping page for another collection");
                continue;
            }
        }

        let Some(products) = collection.products.as_ref() else {
            continue;
        };

        for product in products.nodes() {
            let Some(product_id) = product.id.as_ref().filter(|id| !id.is_empty()) else {
                debug!(page = index, "Dropping product without id");
                continue;
            };

            let variants = product.variants.iter().flat_map(|c| c.nodes());
            snapshots.extend(variants.map(|node| VariantSnapshot {
                variant_id: node.id.clone(),
                product_id: Some(product_id.clone()),
                price: node.price.clone(),
                compare_at_price: node.compare_at_price.clone(),
            }));
        }

        if index + 1 == pages.len() && products.has_next_page() {
            warn!("Last page reports more products; export may be incomplete");
        }
    }

    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARIANT_PAGE: &str = r#"{
        "data": {
            "productVariants": {
                "pageInfo": { "hasNextPage": false, "endCursor": "abc" },
                "edges": [
                    { "node": { "id": "v1", "price": "34.13", "compareAtPrice": "68.26",
                                "product": { "id": "p1" } } },
                    { "node": { "id": "v2", "price": "12.00", "compareAtPrice": null,
                                "product": { "id": "p1" } } },
                    { "node": null },
                    { "node": { "id": "v3", "price": null } }
                ]
            }
        }
    }"#;

    #[test]
    fn test_single_variant_page() {
        let pages = parse_pages::<VariantsData>(VARIANT_PAGE).unwrap();
        let snapshots = variant_snapshots(&pages);

        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].variant_id.as_deref(), Some("v1"));
        assert_eq!(snapshots[0].product_id.as_deref(), Some("p1"));
        assert_eq!(snapshots[0].compare_at_price.as_deref(), Some("68.26"));
        assert_eq!(snapshots[1].compare_at_price, None);
        assert_eq!(snapshots[2].price, None);
        assert_eq!(snapshots[2].product_id, None);
    }

    #[test]
    fn test_page_array_keeps_order() {
        let json = format!("[{VARIANT_PAGE}, {VARIANT_PAGE}]");
        let pages = parse_pages::<VariantsData>(&json).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(variant_snapshots(&pages).len(), 6);
    }

    #[test]
    fn test_error_page_without_data() {
        let pages = parse_pages::<VariantsData>(
            r#"{ "errors": [ { "message": "Throttled" } ] }"#,
        )
        .unwrap();
        assert_eq!(pages[0].errors[0].message, "Throttled");
        assert!(variant_snapshots(&pages).is_empty());
    }

    #[test]
    fn test_collection_page() {
        let pages = parse_pages::<CollectionData>(
            r#"{
                "data": {
                    "collection": {
                        "id": "c1",
                        "products": {
                            "pageInfo": { "hasNextPage": false },
                            "edges": [
                                { "node": { "id": "p1", "variants": { "edges": [
                                    { "node": { "id": "v1", "price": "34.95", "compareAtPrice": null } },
                                    { "node": { "id": "v2", "price": "10.00", "compareAtPrice": "20.00" } }
                                ] } } },
                                { "node": { "id": null, "variants": { "edges": [
                                    { "node": { "id": "v3", "price": "5.00" } }
                                ] } } }
                            ]
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let snapshots = collection_snapshots(&pages, "c1");
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots.iter().all(|s| s.product_id.as_deref() == Some("p1")));

        assert!(collection_snapshots(&pages, "c2").is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_pages::<VariantsData>("{ not json").is_err());
    }
}
