//! Admin handlers for browsing the BigBuy catalog and importing from it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use greengoods_bigbuy::ProductFilter;
use greengoods_core::ProductRecord;

use crate::middleware::RequestId;

use super::{map_db_error, map_pipeline_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    pub items: Vec<ProductRecord>,
    pub total: u64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryItem {
    pub id: serde_json::Value,
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImportRequest {
    pub external_id: String,
}

/// GET /api/v1/bigbuy/search — search the upstream catalog.
pub(super) async fn search_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let client = greengoods_pipeline::client_from_config(&state.config)
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    let filter = ProductFilter {
        query: query.query,
        category: query.category,
        limit: query.limit.unwrap_or(20),
        offset: query.offset.unwrap_or(0),
    };

    let page = greengoods_pipeline::search_products(&client, &filter)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SearchData {
            items: page.items,
            total: page.total,
            has_more: page.has_more,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/bigbuy/products/{external_id} — transformed upstream detail.
///
/// Returns the record as it would be stored, without writing anything.
pub(super) async fn get_catalog_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(external_id): Path<String>,
) -> Result<Json<ApiResponse<ProductRecord>>, ApiError> {
    let client = greengoods_pipeline::client_from_config(&state.config)
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    let raw = client
        .fetch_product_detail(&external_id)
        .await
        .map_err(|e| {
            map_pipeline_error(req_id.0.clone(), &greengoods_pipeline::PipelineError::from(e))
        })?;
    let record = greengoods_bigbuy::to_product_record(&raw, chrono::Utc::now());

    Ok(Json(ApiResponse {
        data: record,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/bigbuy/categories — flat upstream category list.
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CategoryItem>>>, ApiError> {
    let client = greengoods_pipeline::client_from_config(&state.config)
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    let categories = client.fetch_categories().await.map_err(|e| {
        map_pipeline_error(req_id.0.clone(), &greengoods_pipeline::PipelineError::from(e))
    })?;

    let data = categories
        .into_iter()
        .map(|c| CategoryItem {
            id: c.id,
            name: c.name,
            url: c.url,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/bigbuy/import — import one product from the upstream catalog.
///
/// Already-imported external ids are rejected with 409 before any upstream
/// call; a deliberate re-import goes through DELETE first.
pub(super) async fn import_catalog_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ImportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductRecord>>), ApiError> {
    let rid = &req_id.0;

    let external_id = body.external_id.trim().to_owned();
    if external_id.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "external_id must not be empty",
        ));
    }

    let client = greengoods_pipeline::client_from_config(&state.config)
        .map_err(|e| map_pipeline_error(rid.clone(), &e))?;

    let imported = greengoods_db::list_imported_external_ids(&state.pool)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if imported.contains(&external_id) {
        return Err(ApiError::new(
            rid,
            "conflict",
            format!("product with external id '{external_id}' is already imported"),
        ));
    }

    let record = greengoods_pipeline::import_product(&state.pool, &client, &external_id)
        .await
        .map_err(|e| map_pipeline_error(rid.clone(), &e))?;

    tracing::info!(product_id = %record.id, "admin import completed");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: record,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
