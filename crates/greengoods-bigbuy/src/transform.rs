//! Pure transformer from raw BigBuy payloads to storefront records.
//!
//! No I/O happens here. Numeric fields follow parse-or-0 semantics: a
//! malformed price or stock value becomes 0 rather than failing the item,
//! and missing nested objects degrade to empty strings. The caller supplies
//! the timestamp so the mapping itself stays deterministic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use greengoods_core::{
    default_meta_description, default_meta_title, slugify, AdminSeo, ProductRecord,
};

use crate::types::RawProduct;

/// Maps a raw product payload to the canonical [`ProductRecord`].
///
/// The record id is derived from the upstream id (string or integer) and is
/// stable across repeated transforms of the same product.
#[must_use]
pub fn to_product_record(raw: &RawProduct, now: DateTime<Utc>) -> ProductRecord {
    let external_id = value_to_id_string(&raw.id);
    let name = raw.name.clone().unwrap_or_default();
    let description = raw.description.clone().unwrap_or_default();

    let retail = value_to_decimal(&raw.retail_price);
    let wholesale = opt_decimal(&raw.wholesale_price);

    ProductRecord {
        id: ProductRecord::derive_id(&external_id),
        name,
        description,
        price: retail,
        // Wholesale price is only meaningful as a comparison point when it
        // is set and differs from the retail price.
        original_price: wholesale.filter(|w| *w != retail),
        category: raw
            .category
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_default(),
        subcategory: raw.subcategory.as_ref().and_then(|c| c.name.clone()),
        brand: raw.brand.as_ref().and_then(|b| b.name.clone()),
        images: raw.images.iter().filter_map(|i| i.url.clone()).collect(),
        stock: value_to_stock(&raw.stock),
        active: raw.active.unwrap_or(true),
        weight: opt_decimal(&raw.weight),
        external_id: Some(external_id),
        sku: raw.sku.clone(),
        last_updated: now,
    }
}

/// Derives the admin console's SEO metadata for a raw product.
///
/// All fields are deterministic functions of the payload; merchandising
/// flags default to false and are owned by the admin console after import.
#[must_use]
pub fn to_admin_seo(raw: &RawProduct) -> AdminSeo {
    let name = raw.name.as_deref().unwrap_or_default();
    let description = raw.description.as_deref().unwrap_or_default();

    let mut tags: Vec<String> = [
        raw.category.as_ref().and_then(|c| c.name.as_deref()),
        raw.subcategory.as_ref().and_then(|c| c.name.as_deref()),
    ]
    .into_iter()
    .flatten()
    .map(slugify)
    .filter(|t| !t.is_empty())
    .collect();
    tags.dedup();

    AdminSeo {
        meta_title: default_meta_title(name),
        meta_description: default_meta_description(description),
        slug: slugify(name),
        image_alt: name.to_string(),
        tags,
        featured: false,
        sustainable: false,
        vegan: false,
        cruelty_free: false,
    }
}

/// Renders a JSON id (string or integer) as a plain string; anything else
/// becomes the empty string.
fn value_to_id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Parse-or-0 for decimal fields that arrive as strings or numbers.
fn value_to_decimal(value: &Value) -> Decimal {
    opt_decimal(value).unwrap_or_default()
}

/// Like [`value_to_decimal`] but distinguishes "absent/unparseable" from 0.
fn opt_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Parse-or-0 for stock, clamped to non-negative.
fn value_to_stock(value: &Value) -> i32 {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    let stock = parsed.unwrap_or(0).max(0);
    i32::try_from(stock).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawBrandRef, RawCategoryRef, RawImage};
    use serde_json::json;

    fn transform(raw: &RawProduct) -> ProductRecord {
        to_product_record(raw, Utc::now())
    }

    #[test]
    fn eco_mug_scenario() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": "42",
            "name": "Eco Mug",
            "retailPrice": "9.5",
            "stock": "0"
        }))
        .expect("raw product should deserialize");

        let record = transform(&raw);
        assert_eq!(record.id, "bigbuy-42");
        assert_eq!(record.price, Decimal::new(95, 1));
        assert_eq!(record.stock, 0);
        assert!(record.images.is_empty());
        assert_eq!(to_admin_seo(&raw).slug, "eco-mug");
    }

    #[test]
    fn empty_payload_never_panics() {
        let record = transform(&RawProduct::default());
        assert_eq!(record.id, "bigbuy-");
        assert_eq!(record.name, "");
        assert_eq!(record.category, "");
        assert_eq!(record.price, Decimal::ZERO);
        assert_eq!(record.stock, 0);
        assert!(record.images.is_empty());
        assert!(record.subcategory.is_none());
        assert!(record.brand.is_none());
    }

    #[test]
    fn malformed_numerics_parse_to_zero() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": 7,
            "retailPrice": "not-a-price",
            "stock": "many",
            "weight": {"unit": "kg"}
        }))
        .expect("raw product should deserialize");

        let record = transform(&raw);
        assert_eq!(record.price, Decimal::ZERO);
        assert_eq!(record.stock, 0);
        assert!(record.weight.is_none());
    }

    #[test]
    fn numeric_json_values_accepted() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": 42,
            "retailPrice": 12.99,
            "wholesalePrice": 8.5,
            "stock": 17
        }))
        .expect("raw product should deserialize");

        let record = transform(&raw);
        assert_eq!(record.id, "bigbuy-42");
        assert_eq!(record.price.to_string(), "12.99");
        assert_eq!(record.original_price.map(|d| d.to_string()).as_deref(), Some("8.5"));
        assert_eq!(record.stock, 17);
    }

    #[test]
    fn negative_stock_clamped_to_zero() {
        let raw: RawProduct = serde_json::from_value(json!({"id": "1", "stock": -5}))
            .expect("raw product should deserialize");
        assert_eq!(transform(&raw).stock, 0);
    }

    #[test]
    fn images_map_to_urls_skipping_missing() {
        let raw = RawProduct {
            id: json!("9"),
            images: vec![
                RawImage {
                    url: Some("https://img.example/a.jpg".to_string()),
                    is_cover: Some(true),
                },
                RawImage {
                    url: None,
                    is_cover: None,
                },
                RawImage {
                    url: Some("https://img.example/b.jpg".to_string()),
                    is_cover: None,
                },
            ],
            ..RawProduct::default()
        };

        let record = transform(&raw);
        assert_eq!(
            record.images,
            vec!["https://img.example/a.jpg", "https://img.example/b.jpg"]
        );
        assert_eq!(record.thumbnail(), "https://img.example/a.jpg");
    }

    #[test]
    fn nested_objects_degrade_gracefully() {
        let raw = RawProduct {
            id: json!("3"),
            category: Some(RawCategoryRef {
                id: json!(12),
                name: Some("Kitchen".to_string()),
            }),
            subcategory: Some(RawCategoryRef::default()),
            brand: Some(RawBrandRef { name: None }),
            ..RawProduct::default()
        };

        let record = transform(&raw);
        assert_eq!(record.category, "Kitchen");
        assert!(record.subcategory.is_none());
        assert!(record.brand.is_none());
    }

    #[test]
    fn original_price_dropped_when_equal_to_retail() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": "5",
            "retailPrice": "10.00",
            "wholesalePrice": "10.00"
        }))
        .expect("raw product should deserialize");
        assert!(transform(&raw).original_price.is_none());
    }

    #[test]
    fn admin_seo_defaults_for_nameless_product() {
        // Absent name intentionally degrades to empty-string derivations;
        // the import boundary warns instead of rejecting.
        let seo = to_admin_seo(&RawProduct::default());
        assert_eq!(seo.slug, "");
        assert_eq!(seo.meta_title, " - Premium Quality");
        assert_eq!(seo.meta_description, "");
        assert!(!seo.featured && !seo.sustainable && !seo.vegan && !seo.cruelty_free);
    }

    #[test]
    fn admin_seo_derives_tags_and_truncated_description() {
        let raw = RawProduct {
            id: json!("8"),
            name: Some("Bamboo Toothbrush".to_string()),
            description: Some("d".repeat(300)),
            category: Some(RawCategoryRef {
                id: json!(1),
                name: Some("Personal Care".to_string()),
            }),
            subcategory: Some(RawCategoryRef {
                id: json!(2),
                name: Some("Oral Care".to_string()),
            }),
            ..RawProduct::default()
        };

        let seo = to_admin_seo(&raw);
        assert_eq!(seo.slug, "bamboo-toothbrush");
        assert_eq!(seo.meta_title, "Bamboo Toothbrush - Premium Quality");
        assert_eq!(seo.meta_description.chars().count(), 160);
        assert_eq!(seo.tags, vec!["personal-care", "oral-care"]);
        assert_eq!(seo.image_alt, "Bamboo Toothbrush");
    }

    #[test]
    fn transform_is_deterministic_for_same_input() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": "42",
            "name": "Eco Mug",
            "retailPrice": "9.5"
        }))
        .expect("raw product should deserialize");

        let now = Utc::now();
        let a = to_product_record(&raw, now);
        let b = to_product_record(&raw, now);
        assert_eq!(a.id, b.id);
        assert_eq!(a.price, b.price);
        assert_eq!(to_admin_seo(&raw).slug, to_admin_seo(&raw).slug);
    }
}
