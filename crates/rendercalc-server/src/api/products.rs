use std::collections::HashMap;

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use rendercalc_core::LiveProduct;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_shopify_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProductsRequest {
    handles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductsResponse {
    products: HashMap<String, LiveProduct>,
}

/// `POST /products-by-handles`: live prices and variants for a set of handles.
pub(super) async fn products_by_handles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ProductsRequest>, JsonRejection>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let Ok(Json(request)) = payload else {
        tracing::warn!(request_id = %req_id.0, "invalid handles array");
        return Err(ApiError::new("bad_request", "Invalid handles array"));
    };
    let storefront = state.storefront()?;

    let products = storefront
        .products_by_handles(&request.handles)
        .await
        .map_err(|e| map_shopify_error(&req_id.0, "Failed to fetch product prices", e))?;

    tracing::info!(
        request_id = %req_id.0,
        requested = request.handles.len(),
        found = products.len(),
        "served live product prices"
    );
    Ok(Json(ProductsResponse { products }))
}
