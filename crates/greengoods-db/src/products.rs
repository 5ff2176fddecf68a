//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub category: String,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    /// JSON array of image URL strings.
    pub images: serde_json::Value,
    pub stock: i32,
    pub in_stock: bool,
    pub active: bool,
    pub weight: Option<Decimal>,
    pub external_id: Option<String>,
    pub sku: Option<String>,
    pub origin: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_stock_sync: Option<DateTime<Utc>>,
}

/// Minimal projection used by the stock synchronizer's candidate query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackedProduct {
    pub id: String,
    pub external_id: String,
    pub stock: i32,
}

/// One queued stock mutation, applied at the end of a sync run.
#[derive(Debug, Clone)]
pub struct StockUpdate {
    pub id: String,
    pub stock: i32,
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, original_price, category, \
     subcategory, brand, images, stock, in_stock, active, weight, \
     external_id, sku, origin, created_at, updated_at, last_stock_sync";

// ---------------------------------------------------------------------------
// products operations
// ---------------------------------------------------------------------------

/// Upserts a product from a transformed record.
///
/// Conflicts on `id` overwrite every transformer-owned column in place
/// (last write wins); `created_at` is preserved. Used by the importer, where
/// a repeated import of the same external id fully supersedes the first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_product(
    pool: &PgPool,
    record: &greengoods_core::ProductRecord,
) -> Result<(), DbError> {
    let images = json!(record.images);

    sqlx::query(
        "INSERT INTO products \
             (id, name, description, price, original_price, category, subcategory, \
              brand, images, stock, in_stock, active, weight, external_id, sku) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, \
                 $8, $9::jsonb, $10, $11, $12, $13, $14, $15) \
         ON CONFLICT (id) DO UPDATE SET \
             name           = EXCLUDED.name, \
             description    = EXCLUDED.description, \
             price          = EXCLUDED.price, \
             original_price = EXCLUDED.original_price, \
             category       = EXCLUDED.category, \
             subcategory    = EXCLUDED.subcategory, \
             brand          = EXCLUDED.brand, \
             images         = EXCLUDED.images, \
             stock          = EXCLUDED.stock, \
             in_stock       = EXCLUDED.in_stock, \
             active         = EXCLUDED.active, \
             weight         = EXCLUDED.weight, \
             external_id    = EXCLUDED.external_id, \
             sku            = EXCLUDED.sku, \
             updated_at     = NOW()",
    )
    .bind(&record.id)
    .bind(&record.name)
    .bind(&record.description)
    .bind(record.price)
    .bind(record.original_price)
    .bind(&record.category)
    .bind(&record.subcategory)
    .bind(&record.brand)
    .bind(images)
    .bind(record.stock)
    .bind(record.stock > 0)
    .bind(record.active)
    .bind(record.weight)
    .bind(&record.external_id)
    .bind(&record.sku)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetches a single product by storefront id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_product(pool: &PgPool, id: &str) -> Result<ProductRow, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the synchronizer's default candidate set: active BigBuy products
/// that still carry an upstream id to check stock against.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tracked_products(pool: &PgPool) -> Result<Vec<TrackedProduct>, DbError> {
    let rows = sqlx::query_as::<_, TrackedProduct>(
        "SELECT id, external_id, stock \
         FROM products \
         WHERE origin = 'bigbuy' AND active AND external_id IS NOT NULL \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Like [`list_tracked_products`], restricted to an explicit id list.
///
/// Ids with no matching row are silently absent from the result; the caller
/// reports them through its aggregate counts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tracked_products_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<TrackedProduct>, DbError> {
    let rows = sqlx::query_as::<_, TrackedProduct>(
        "SELECT id, external_id, stock \
         FROM products \
         WHERE id = ANY($1) AND external_id IS NOT NULL \
         ORDER BY id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Applies a run's queued stock updates in one transaction.
///
/// Updates are split into statements of at most `batch_max` rows (the
/// store's batch ceiling); all statements commit atomically. Each touched
/// row gets `stock`, the derived `in_stock`, `updated_at`, and
/// `last_stock_sync`.
///
/// No version check is performed: if an order-fulfillment writer decremented
/// `stock` between fetch and commit, this write wins.
///
/// Returns the number of rows updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn apply_stock_updates(
    pool: &PgPool,
    updates: &[StockUpdate],
    batch_max: usize,
) -> Result<u64, DbError> {
    if updates.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut total = 0u64;

    for batch in updates.chunks(batch_max.max(1)) {
        let ids: Vec<String> = batch.iter().map(|u| u.id.clone()).collect();
        let stocks: Vec<i32> = batch.iter().map(|u| u.stock).collect();

        let result = sqlx::query(
            "UPDATE products AS p SET \
                 stock           = u.stock, \
                 in_stock        = u.stock > 0, \
                 updated_at      = NOW(), \
                 last_stock_sync = NOW() \
             FROM UNNEST($1::text[], $2::int[]) AS u(id, stock) \
             WHERE p.id = u.id",
        )
        .bind(&ids)
        .bind(&stocks)
        .execute(&mut *tx)
        .await?;

        total += result.rows_affected();
    }

    tx.commit().await?;
    Ok(total)
}

/// Folds an on-demand stock snapshot into the product row, but only when the
/// fetched value differs from what is stored (no-op writes are skipped).
///
/// Returns `true` if a row was updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_stock_if_changed(
    pool: &PgPool,
    id: &str,
    stock: i32,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE products SET \
             stock           = $2, \
             in_stock        = $2 > 0, \
             updated_at      = NOW(), \
             last_stock_sync = NOW() \
         WHERE id = $1 AND stock <> $2",
    )
    .bind(id)
    .bind(stock)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Hard-deletes a product row. Does not cascade to `admin_products` or
/// `sync_logs`.
///
/// Returns `true` if a row was deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_product(pool: &PgPool, id: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Updates a product's price and optionally its comparison price.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matches `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_pricing(
    pool: &PgPool,
    id: &str,
    price: Decimal,
    original_price: Option<Decimal>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE products SET \
             price          = $2, \
             original_price = COALESCE($3, original_price), \
             updated_at     = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(price)
    .bind(original_price)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Returns the external ids of every BigBuy product already imported.
///
/// The import HTTP handler consults this set to reject duplicate imports
/// before calling upstream; the importer itself does not enforce uniqueness
/// beyond the derived primary key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_imported_external_ids(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT external_id FROM products \
         WHERE origin = 'bigbuy' AND external_id IS NOT NULL",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
