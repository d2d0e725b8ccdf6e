use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rendercalc_shopify::ProductVariants;

use crate::middleware::RequestId;

use super::{map_shopify_error, ApiError, AppState};

/// `GET /variants-by-handle/{handle}`: colour choices for one product.
pub(super) async fn variants_by_handle(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ProductVariants>, ApiError> {
    let storefront = state.storefront()?;

    let variants = storefront
        .variants_by_handle(&handle)
        .await
        .map_err(|e| map_shopify_error(&req_id.0, "Failed to fetch product variants", e))?;

    match variants {
        Some(variants) => {
            tracing::debug!(
                request_id = %req_id.0,
                %handle,
                colors = variants.color_variants.len(),
                "served colour variants"
            );
            Ok(Json(variants))
        }
        None => {
            tracing::warn!(request_id = %req_id.0, %handle, "product not found upstream");
            Err(ApiError::new("not_found", "Product not found"))
        }
    }
}
