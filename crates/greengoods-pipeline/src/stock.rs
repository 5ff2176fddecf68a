//! The stock synchronizer: reconciles stored stock against BigBuy for a set
//! of tracked products while minimizing redundant writes.
//!
//! Processing is chunked: within a chunk every stock fetch runs
//! concurrently and the chunk is joined before the next one starts, with a
//! fixed pause between chunks as static upstream pacing. There is no retry,
//! no run-level timeout, and no cancellation; a per-product fetch failure is
//! counted and skipped, never aborting the run.

use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use sqlx::PgPool;

use greengoods_bigbuy::{BigBuyClient, BigBuyError};
use greengoods_core::AppConfig;
use greengoods_db::{StockUpdate, TrackedProduct};

use crate::PipelineError;

/// How a run was initiated; recorded verbatim in the sync log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunType {
    /// Full reconciliation over every tracked product.
    BulkSync,
    /// Admin-supplied explicit id list.
    BatchUpdate,
    /// Unattended cron-triggered run.
    ScheduledUpdate,
}

impl RunType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunType::BulkSync => "bulk_sync",
            RunType::BatchUpdate => "batch_update",
            RunType::ScheduledUpdate => "scheduled_update",
        }
    }
}

/// Parameters for one synchronizer run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Explicit candidate ids; `None` selects every tracked product.
    pub product_ids: Option<Vec<String>>,
    pub chunk_size: usize,
    /// Pause between chunks; not applied after the final chunk.
    pub chunk_delay: Duration,
    /// Row ceiling per update statement at commit time.
    pub batch_max: usize,
    pub run_type: RunType,
    /// Admin user id, or `"system"` for scheduled runs.
    pub performed_by: String,
}

impl SyncOptions {
    /// Builds run options from application config.
    #[must_use]
    pub fn from_config(config: &AppConfig, run_type: RunType, performed_by: &str) -> Self {
        Self {
            product_ids: None,
            chunk_size: config.sync_chunk_size,
            chunk_delay: Duration::from_millis(config.sync_chunk_delay_ms),
            batch_max: config.sync_batch_max,
            run_type,
            performed_by: performed_by.to_string(),
        }
    }
}

/// Aggregate counts for one completed run; mirrored into the sync log.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncOutcome {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Runs one stock synchronization pass.
///
/// Selects the candidate set, fetches current stock in chunked concurrent
/// fan-out, queues an update for every product whose fetched stock differs
/// from the stored value, commits all queued updates in a single transaction
/// at the end of the run, and appends exactly one sync log row.
///
/// Per-item fetch failures are logged and reflected only in the aggregate
/// counts. Products whose stock is unchanged produce no write at all.
///
/// # Errors
///
/// Returns [`PipelineError::Db`] if the candidate query, the final commit,
/// or the log insert fails. Upstream errors never fail the run.
pub async fn sync_stock(
    pool: &PgPool,
    client: &BigBuyClient,
    options: &SyncOptions,
) -> Result<SyncOutcome, PipelineError> {
    let candidates = match &options.product_ids {
        Some(ids) => greengoods_db::list_tracked_products_by_ids(pool, ids).await?,
        None => greengoods_db::list_tracked_products(pool).await?,
    };

    tracing::info!(
        run_type = options.run_type.as_str(),
        candidates = candidates.len(),
        chunk_size = options.chunk_size,
        "stock sync: starting run"
    );

    let mut updates: Vec<StockUpdate> = Vec::new();
    let mut failed = 0usize;

    for (index, chunk) in candidates.chunks(options.chunk_size.max(1)).enumerate() {
        if index > 0 && !options.chunk_delay.is_zero() {
            tokio::time::sleep(options.chunk_delay).await;
        }

        let (chunk_updates, chunk_failed) = fetch_chunk(client, chunk).await;
        updates.extend(chunk_updates);
        failed += chunk_failed;
    }

    let updated = greengoods_db::apply_stock_updates(pool, &updates, options.batch_max).await?;
    let updated = usize::try_from(updated).unwrap_or(usize::MAX);

    let outcome = SyncOutcome {
        processed: candidates.len(),
        updated,
        unchanged: candidates.len() - updates.len() - failed,
        failed,
    };

    greengoods_db::insert_sync_log(
        pool,
        &greengoods_db::NewSyncLog {
            run_type: options.run_type.as_str(),
            products_processed: count(outcome.processed),
            synced_products: count(outcome.updated + outcome.unchanged),
            successful_updates: count(outcome.updated),
            failed_updates: count(outcome.failed),
            performed_by: &options.performed_by,
        },
    )
    .await?;

    tracing::info!(
        processed = outcome.processed,
        updated = outcome.updated,
        unchanged = outcome.unchanged,
        failed = outcome.failed,
        "stock sync: run complete"
    );

    Ok(outcome)
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Fan-out over one chunk: fetch every product's stock concurrently, join,
/// and return the queued deltas plus the per-item failure count.
async fn fetch_chunk(
    client: &BigBuyClient,
    chunk: &[TrackedProduct],
) -> (Vec<StockUpdate>, usize) {
    let fetches = chunk
        .iter()
        .map(|product| async move { (product, client.fetch_stock(&product.external_id).await) });

    let mut updates = Vec::new();
    let mut failed = 0usize;

    for (product, result) in join_all(fetches).await {
        match result {
            Ok(raw) => {
                let stock = clamp_quantity(raw.quantity);
                if stock != product.stock {
                    updates.push(StockUpdate {
                        id: product.id.clone(),
                        stock,
                    });
                }
            }
            Err(err) => {
                log_fetch_failure(&product.id, &err);
                failed += 1;
            }
        }
    }

    (updates, failed)
}

fn log_fetch_failure(product_id: &str, err: &BigBuyError) {
    tracing::warn!(
        product_id,
        error = %err,
        "stock sync: fetch failed; product skipped for this run"
    );
}

/// Upstream quantities are i64 and occasionally negative; stored stock is a
/// non-negative i32.
fn clamp_quantity(quantity: i64) -> i32 {
    i32::try_from(quantity.max(0)).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_type_strings_match_log_schema() {
        assert_eq!(RunType::BulkSync.as_str(), "bulk_sync");
        assert_eq!(RunType::BatchUpdate.as_str(), "batch_update");
        assert_eq!(RunType::ScheduledUpdate.as_str(), "scheduled_update");
    }

    #[test]
    fn clamp_quantity_bounds() {
        assert_eq!(clamp_quantity(-3), 0);
        assert_eq!(clamp_quantity(0), 0);
        assert_eq!(clamp_quantity(42), 42);
        assert_eq!(clamp_quantity(i64::MAX), i32::MAX);
    }

    #[test]
    fn chunk_partition_matches_expected_shape() {
        // 25 candidates at chunk size 10 → chunks of 10, 10, 5.
        let candidates: Vec<u32> = (0..25).collect();
        let sizes: Vec<usize> = candidates.chunks(10).map(<[u32]>::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }
}
