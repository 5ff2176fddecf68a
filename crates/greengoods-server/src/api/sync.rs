//! Admin handlers for triggering stock runs and reading the audit trail.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use greengoods_pipeline::{RunType, SyncOptions, SyncOutcome};

use crate::middleware::RequestId;

use super::{
    map_db_error, map_pipeline_error, normalize_limit, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

#[derive(Debug, Deserialize)]
pub(super) struct TriggerSyncRequest {
    pub product_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SyncLogQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SyncLogItem {
    pub id: i64,
    pub run_type: String,
    pub products_processed: i32,
    pub synced_products: i32,
    pub successful_updates: i32,
    pub failed_updates: i32,
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

/// POST /api/v1/sync/stock — run a stock synchronization now.
///
/// With `product_ids` the run is limited to those ids and logged as a batch
/// update; without it every tracked product is a candidate.
pub(super) async fn trigger_stock_sync(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TriggerSyncRequest>,
) -> Result<Json<ApiResponse<SyncOutcome>>, ApiError> {
    let rid = &req_id.0;

    let client = greengoods_pipeline::client_from_config(&state.config)
        .map_err(|e| map_pipeline_error(rid.clone(), &e))?;

    let run_type = match &body.product_ids {
        Some(_) => RunType::BatchUpdate,
        None => RunType::BulkSync,
    };
    let mut options = SyncOptions::from_config(&state.config, run_type, "admin");
    options.product_ids = body.product_ids;

    let outcome = greengoods_pipeline::sync_stock(&state.pool, &client, &options)
        .await
        .map_err(|e| map_pipeline_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/sync/logs — recent runs, newest first.
pub(super) async fn list_sync_logs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SyncLogQuery>,
) -> Result<Json<ApiResponse<Vec<SyncLogItem>>>, ApiError> {
    let rows = greengoods_db::list_sync_logs(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| SyncLogItem {
            id: row.id,
            run_type: row.run_type,
            products_processed: row.products_processed,
            synced_products: row.synced_products,
            successful_updates: row.successful_updates,
            failed_updates: row.failed_updates,
            performed_by: row.performed_by,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
