//! Public stock-check endpoint.
//!
//! This route is exposed to storefront clients, so its contract is blunt:
//! malformed ids get a 400, and every internal failure collapses to an
//! in-stock=false answer with HTTP 200. Callers never see a 5xx, and the
//! response never reveals whether the failure was the database, the
//! upstream API, or an unknown product. An `errorRef` correlates the
//! response with server logs.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use greengoods_core::StockSnapshot;

use super::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct StockCheckQuery {
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StockCheckBody {
    pub in_stock: bool,
    pub available_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_ref: Option<String>,
}

impl StockCheckBody {
    fn available(product_id: String, snapshot: StockSnapshot) -> Self {
        Self {
            in_stock: snapshot.available,
            available_quantity: snapshot.stock,
            product_id: Some(product_id),
            timestamp: Utc::now(),
            error_ref: None,
        }
    }

    fn unavailable(error_ref: Option<String>) -> Self {
        Self {
            in_stock: false,
            available_quantity: 0,
            product_id: None,
            timestamp: Utc::now(),
            error_ref,
        }
    }
}

/// GET /api/v1/stock-check?productId=...
pub(super) async fn check_stock(
    State(state): State<AppState>,
    Query(query): Query<StockCheckQuery>,
) -> Response {
    let Some(product_id) = query.product_id.filter(|id| is_well_formed(id)) else {
        return respond(StatusCode::BAD_REQUEST, &StockCheckBody::unavailable(None));
    };

    match resolve_stock(&state, &product_id).await {
        Ok(snapshot) => respond(
            StatusCode::OK,
            &StockCheckBody::available(product_id, snapshot),
        ),
        Err(reason) => {
            let error_ref = Uuid::new_v4().to_string();
            tracing::error!(
                product_id = %product_id,
                error_ref = %error_ref,
                reason = %reason,
                "stock check failed; returning unavailable"
            );
            respond(
                StatusCode::OK,
                &StockCheckBody::unavailable(Some(error_ref)),
            )
        }
    }
}

/// Loads the product and, for dropshipped items, reconciles against live
/// upstream stock before answering.
async fn resolve_stock(state: &AppState, product_id: &str) -> Result<StockSnapshot, String> {
    let product = greengoods_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| format!("product load failed: {e}"))?;

    let external_id = match (&product.origin[..], &product.external_id) {
        ("bigbuy", Some(external_id)) => external_id.clone(),
        _ => return Ok(StockSnapshot::new(product.stock)),
    };

    let client = greengoods_pipeline::client_from_config(&state.config)
        .map_err(|e| format!("client unavailable: {e}"))?;
    let raw = client
        .fetch_stock(&external_id)
        .await
        .map_err(|e| format!("upstream fetch failed: {e}"))?;
    let quantity = i32::try_from(raw.quantity.max(0)).unwrap_or(i32::MAX);

    // Fold the fresh answer back into the store so the next sync run and
    // this endpoint agree.
    if quantity != product.stock {
        greengoods_db::update_stock_if_changed(&state.pool, product_id, quantity)
            .await
            .map_err(|e| format!("stock write failed: {e}"))?;
    }

    Ok(StockSnapshot::new(quantity))
}

/// Product ids are path-safe by construction; anything else is rejected
/// before the database is touched.
fn is_well_formed(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn respond(status: StatusCode, body: &StockCheckBody) -> Response {
    let mut response = (status, Json(body)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=60"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_accepts_derived_ids() {
        assert!(is_well_formed("bigbuy-42"));
        assert!(is_well_formed("local_product-1"));
        assert!(is_well_formed("A1"));
    }

    #[test]
    fn well_formed_rejects_bad_input() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("id with spaces"));
        assert!(!is_well_formed("drop;table"));
        assert!(!is_well_formed("../../etc/passwd"));
        assert!(!is_well_formed(&"x".repeat(65)));
    }

    #[test]
    fn unavailable_body_hides_internals() {
        let body = StockCheckBody::unavailable(Some("ref-1".to_string()));
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["inStock"], false);
        assert_eq!(json["availableQuantity"], 0);
        assert_eq!(json["errorRef"], "ref-1");
        assert!(json.get("productId").is_none());
    }
}
