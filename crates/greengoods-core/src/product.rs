use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prefix applied to BigBuy-sourced product ids, e.g. `bigbuy-12345`.
///
/// The derived id is stable: it is computed once from the upstream id at
/// import time and never regenerated afterwards.
pub const PRODUCT_ID_PREFIX: &str = "bigbuy-";

/// The storefront's canonical catalog entry, as produced by the transformer
/// and persisted to the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Source-prefixed id, e.g. `bigbuy-12345`.
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Pre-markup comparison price, shown struck-through on the storefront.
    pub original_price: Option<Decimal>,
    pub category: String,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    /// Ordered image URLs; the first entry doubles as the thumbnail.
    pub images: Vec<String>,
    /// Never negative; malformed upstream values parse to 0.
    pub stock: i32,
    pub active: bool,
    /// Weight in kilograms when the source provides it.
    pub weight: Option<Decimal>,
    /// Upstream BigBuy id, kept for stock lookups after import.
    pub external_id: Option<String>,
    pub sku: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl ProductRecord {
    /// Derives the stable storefront id from an upstream id.
    #[must_use]
    pub fn derive_id(external_id: &str) -> String {
        format!("{PRODUCT_ID_PREFIX}{external_id}")
    }

    /// Returns `true` when the stored stock level is purchasable.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// First image URL, or the empty string when the product has none.
    #[must_use]
    pub fn thumbnail(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }
}

/// SEO metadata and merchandising flags for the admin console's denormalized
/// product copy.
///
/// Persisted with merge semantics: re-imports only touch the keys the
/// transformer supplies, so manually edited flags survive a re-sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSeo {
    pub meta_title: String,
    /// First 160 characters of the product description.
    pub meta_description: String,
    /// Deterministic, not guaranteed globally unique.
    pub slug: String,
    pub image_alt: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub sustainable: bool,
    pub vegan: bool,
    pub cruelty_free: bool,
}

/// Result of an on-demand stock check. Transient: returned to the caller and
/// only folded into a product update when it differs from the stored stock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub stock: i32,
    pub available: bool,
}

impl StockSnapshot {
    #[must_use]
    pub fn new(stock: i32) -> Self {
        Self {
            stock,
            available: stock > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(stock: i32, images: Vec<String>) -> ProductRecord {
        ProductRecord {
            id: ProductRecord::derive_id("42"),
            name: "Eco Mug".to_string(),
            description: "A reusable mug.".to_string(),
            price: Decimal::new(95, 1),
            original_price: None,
            category: "Kitchen".to_string(),
            subcategory: None,
            brand: None,
            images,
            stock,
            active: true,
            weight: None,
            external_id: Some("42".to_string()),
            sku: None,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn derive_id_prefixes_external_id() {
        assert_eq!(ProductRecord::derive_id("42"), "bigbuy-42");
    }

    #[test]
    fn derive_id_is_stable_across_calls() {
        assert_eq!(ProductRecord::derive_id("99"), ProductRecord::derive_id("99"));
    }

    #[test]
    fn in_stock_true_only_for_positive_stock() {
        assert!(make_record(1, vec![]).in_stock());
        assert!(!make_record(0, vec![]).in_stock());
    }

    #[test]
    fn thumbnail_is_first_image_or_empty() {
        let record = make_record(1, vec!["https://img.example/a.jpg".to_string()]);
        assert_eq!(record.thumbnail(), "https://img.example/a.jpg");
        assert_eq!(make_record(1, vec![]).thumbnail(), "");
    }

    #[test]
    fn stock_snapshot_availability_follows_stock() {
        assert!(StockSnapshot::new(3).available);
        assert!(!StockSnapshot::new(0).available);
    }

    #[test]
    fn product_record_serde_roundtrip() {
        let record = make_record(7, vec!["https://img.example/a.jpg".to_string()]);
        let json = serde_json::to_string(&record).expect("serialize");
        let decoded: ProductRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded.id, record.id);
        assert_eq!(decoded.stock, 7);
        assert_eq!(decoded.price, record.price);
    }
}
