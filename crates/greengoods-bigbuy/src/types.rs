//! Raw BigBuy payload types.
//!
//! The upstream API is loosely typed: numeric fields arrive as strings or
//! numbers depending on endpoint, and nested objects (category, brand) are
//! frequently absent. Every field here is optional or defaulted so that a
//! sparse payload deserializes rather than failing the whole item; the
//! defaulting semantics live in [`crate::transform`].

use serde::Deserialize;
use serde_json::Value;

/// A product as returned by the catalog search and detail endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    /// String or integer depending on endpoint.
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal string or JSON number; malformed values transform to 0.
    #[serde(default, rename = "retailPrice")]
    pub retail_price: Value,
    #[serde(default, rename = "wholesalePrice")]
    pub wholesale_price: Value,
    #[serde(default)]
    pub stock: Value,
    /// Weight in kilograms, when present.
    #[serde(default)]
    pub weight: Value,
    #[serde(default)]
    pub category: Option<RawCategoryRef>,
    #[serde(default)]
    pub subcategory: Option<RawCategoryRef>,
    #[serde(default)]
    pub brand: Option<RawBrandRef>,
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Nested category reference inside a product payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategoryRef {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
}

/// Nested brand reference inside a product payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBrandRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Image descriptor; only the URL is carried into the storefront record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "isCover")]
    pub is_cover: Option<bool>,
}

/// Top-level category from the categories endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Response body of the per-product stock endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawStock {
    pub quantity: i64,
}

/// One page of catalog search results.
#[derive(Debug, Deserialize)]
pub struct ProductPage {
    #[serde(rename = "products")]
    pub items: Vec<RawProduct>,
    pub total: u64,
}
