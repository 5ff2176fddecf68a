//! Database operations for the `admin_products` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `admin_products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminProductRow {
    pub product_id: String,
    pub meta_title: String,
    pub meta_description: String,
    pub slug: String,
    pub image_alt: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub sustainable: bool,
    pub vegan: bool,
    pub cruelty_free: bool,
    pub origin: String,
    pub synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Upserts the SEO metadata for a product with merge semantics.
///
/// Conflicts on `product_id` update only the transformer-supplied key set
/// (titles, slug, tags, provenance). The merchandising flags (`featured`,
/// `sustainable`, `vegan`, `cruelty_free`) are deliberately excluded so
/// manual admin-console edits survive repeated imports.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_admin_product(
    pool: &PgPool,
    product_id: &str,
    seo: &greengoods_core::AdminSeo,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO admin_products \
             (product_id, meta_title, meta_description, slug, image_alt, tags, \
              featured, sustainable, vegan, cruelty_free, origin, synced_at) \
         VALUES ($1, $2, $3, $4, $5, $6, \
                 $7, $8, $9, $10, 'bigbuy', NOW()) \
         ON CONFLICT (product_id) DO UPDATE SET \
             meta_title       = EXCLUDED.meta_title, \
             meta_description = EXCLUDED.meta_description, \
             slug             = EXCLUDED.slug, \
             image_alt        = EXCLUDED.image_alt, \
             tags             = EXCLUDED.tags, \
             origin           = EXCLUDED.origin, \
             synced_at        = NOW()",
    )
    .bind(product_id)
    .bind(&seo.meta_title)
    .bind(&seo.meta_description)
    .bind(&seo.slug)
    .bind(&seo.image_alt)
    .bind(&seo.tags)
    .bind(seo.featured)
    .bind(seo.sustainable)
    .bind(seo.vegan)
    .bind(seo.cruelty_free)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetches the admin metadata row for a product.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_admin_product(pool: &PgPool, product_id: &str) -> Result<AdminProductRow, DbError> {
    let row = sqlx::query_as::<_, AdminProductRow>(
        "SELECT product_id, meta_title, meta_description, slug, image_alt, tags, \
                featured, sustainable, vegan, cruelty_free, origin, synced_at, created_at \
         FROM admin_products \
         WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}
