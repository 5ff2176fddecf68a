//! Admin handlers for stored products: removal and price maintenance.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct UpdatePricingRequest {
    pub price: Decimal,
    /// Percentage markup applied on top of `price`; omitted means the price
    /// is stored as given.
    pub markup: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub(super) struct RemoveData {
    pub id: String,
    pub removed: bool,
}

/// DELETE /api/v1/products/{id} — hard-delete a stored product.
///
/// The admin metadata row is left in place on purpose: removal followed by
/// re-import keeps the curated flags.
pub(super) async fn remove_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RemoveData>>, ApiError> {
    let removed = greengoods_pipeline::remove_product(&state.pool, &id)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    if !removed {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no product with id '{id}'"),
        ));
    }

    Ok(Json(ApiResponse {
        data: RemoveData { id, removed },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/products/{id}/pricing — set a product's price.
pub(super) async fn update_pricing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePricingRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;

    if body.price <= Decimal::ZERO {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "price must be positive",
        ));
    }
    if let Some(markup) = body.markup {
        if markup < Decimal::ZERO {
            return Err(ApiError::new(
                rid,
                "validation_error",
                "markup must not be negative",
            ));
        }
    }

    greengoods_pipeline::update_pricing(&state.pool, &id, body.price, body.markup)
        .await
        .map_err(|e| map_pipeline_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "id": id, "updated": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
