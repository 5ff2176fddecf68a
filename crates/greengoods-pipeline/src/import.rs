//! The catalog importer: admin-triggered search, import, removal, and
//! pricing flows.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use greengoods_bigbuy::{to_admin_seo, to_product_record, BigBuyClient, ProductFilter};
use greengoods_core::ProductRecord;

use crate::PipelineError;

/// One page of transformed search results.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub items: Vec<ProductRecord>,
    pub total: u64,
    pub has_more: bool,
}

/// Searches the upstream catalog and transforms each hit.
///
/// The page-size clamp is inherited from the client; `has_more` reports
/// whether another page exists past `offset + items`.
///
/// # Errors
///
/// Returns [`PipelineError::Upstream`] if the search call fails.
pub async fn search_products(
    client: &BigBuyClient,
    filter: &ProductFilter,
) -> Result<SearchPage, PipelineError> {
    let page = client.search_products(filter).await?;
    let now = Utc::now();

    let items: Vec<ProductRecord> = page
        .items
        .iter()
        .map(|raw| to_product_record(raw, now))
        .collect();

    let seen = u64::from(filter.offset) + items.len() as u64;
    Ok(SearchPage {
        has_more: seen < page.total,
        total: page.total,
        items,
    })
}

/// Imports one product by upstream id: detail fetch, transform, then a
/// single product write plus a merged admin-metadata write.
///
/// The importer itself does not reject duplicates — the derived id makes a
/// repeat import a silent last-write-wins overwrite. Callers that want the
/// duplicate guard consult [`greengoods_db::list_imported_external_ids`]
/// first.
///
/// # Errors
///
/// Returns [`PipelineError::Upstream`] if the detail fetch fails (surfaced
/// whole — this is a single-item flow) or [`PipelineError::Db`] if a write
/// fails.
pub async fn import_product(
    pool: &PgPool,
    client: &BigBuyClient,
    external_id: &str,
) -> Result<ProductRecord, PipelineError> {
    let raw = client.fetch_product_detail(external_id).await?;
    let record = to_product_record(&raw, Utc::now());
    let seo = to_admin_seo(&raw);

    if record.name.is_empty() {
        // Lenient by policy: a nameless upstream payload still imports with
        // empty slug/meta title, but it is worth an operator's attention.
        tracing::warn!(external_id, "importing product with no upstream name");
    }

    greengoods_db::upsert_product(pool, &record).await?;
    greengoods_db::upsert_admin_product(pool, &record.id, &seo).await?;

    tracing::info!(
        product_id = %record.id,
        name = %record.name,
        "catalog import: product imported"
    );

    Ok(record)
}

/// Hard-deletes a product. Admin metadata and sync logs are not cascaded.
///
/// Returns `true` if a row was deleted.
///
/// # Errors
///
/// Returns [`PipelineError::Db`] if the delete fails.
pub async fn remove_product(pool: &PgPool, id: &str) -> Result<bool, PipelineError> {
    let deleted = greengoods_db::delete_product(pool, id).await?;
    if deleted {
        tracing::info!(product_id = id, "catalog import: product removed");
    }
    Ok(deleted)
}

/// Updates a product's pricing.
///
/// Without a markup the supplied price is stored as-is. With a markup of
/// `m` percent the stored price becomes `base * (1 + m/100)` rounded to two
/// decimal places, and the base is kept as the struck-through
/// `original_price`.
///
/// # Errors
///
/// Returns [`PipelineError::Db`] with [`greengoods_db::DbError::NotFound`]
/// inside when the product does not exist.
pub async fn update_pricing(
    pool: &PgPool,
    id: &str,
    base_price: Decimal,
    markup_percent: Option<Decimal>,
) -> Result<(), PipelineError> {
    let (price, original_price) = apply_markup(base_price, markup_percent);
    greengoods_db::update_pricing(pool, id, price, original_price).await?;
    Ok(())
}

fn apply_markup(base: Decimal, markup_percent: Option<Decimal>) -> (Decimal, Option<Decimal>) {
    match markup_percent {
        Some(m) => {
            let factor = Decimal::ONE + m / Decimal::from(100);
            ((base * factor).round_dp(2), Some(base))
        }
        None => (base, None),
    }
}
