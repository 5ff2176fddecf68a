//! Database operations for the append-only `sync_logs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `sync_logs` table. Rows are inserted once per pipeline
/// run and never mutated or deleted by the pipeline.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncLogRow {
    pub id: i64,
    /// `bulk_sync`, `batch_update`, or `scheduled_update`.
    pub run_type: String,
    pub products_processed: i32,
    /// Products whose stock was fetched successfully, updated or not.
    pub synced_products: i32,
    pub successful_updates: i32,
    pub failed_updates: i32,
    /// Admin user id, or `"system"` for scheduled runs.
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

/// The audit record for one completed pipeline run.
#[derive(Debug, Clone)]
pub struct NewSyncLog<'a> {
    pub run_type: &'a str,
    pub products_processed: i32,
    pub synced_products: i32,
    pub successful_updates: i32,
    pub failed_updates: i32,
    pub performed_by: &'a str,
}

/// Appends the audit row for one completed pipeline run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_sync_log(pool: &PgPool, log: &NewSyncLog<'_>) -> Result<SyncLogRow, DbError> {
    let row = sqlx::query_as::<_, SyncLogRow>(
        "INSERT INTO sync_logs \
             (run_type, products_processed, synced_products, successful_updates, \
              failed_updates, performed_by) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, run_type, products_processed, synced_products, \
                   successful_updates, failed_updates, performed_by, created_at",
    )
    .bind(log.run_type)
    .bind(log.products_processed)
    .bind(log.synced_products)
    .bind(log.successful_updates)
    .bind(log.failed_updates)
    .bind(log.performed_by)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the most recent `limit` run logs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sync_logs(pool: &PgPool, limit: i64) -> Result<Vec<SyncLogRow>, DbError> {
    let rows = sqlx::query_as::<_, SyncLogRow>(
        "SELECT id, run_type, products_processed, synced_products, \
                successful_updates, failed_updates, performed_by, created_at \
         FROM sync_logs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
