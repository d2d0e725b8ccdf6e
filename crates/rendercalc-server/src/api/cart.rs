use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use rendercalc_core::CartLine;
use rendercalc_shopify::Cart;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_shopify_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AddToCartRequest {
    items: Vec<CartLine>,
}

#[derive(Debug, Serialize)]
pub(super) struct AddToCartResponse {
    cart: Cart,
}

/// `POST /cart/add`: creates a storefront cart and returns its checkout URL.
pub(super) async fn add_to_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<AddToCartResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) if !request.items.is_empty() => request,
        Ok(_) => return Err(ApiError::new("bad_request", "Cart items must not be empty")),
        Err(rejection) => {
            tracing::warn!(request_id = %req_id.0, error = %rejection, "invalid cart items");
            return Err(ApiError::new("bad_request", "Invalid cart items"));
        }
    };
    let storefront = state.storefront()?;

    let cart = storefront
        .create_cart(&request.items)
        .await
        .map_err(|e| map_shopify_error(&req_id.0, "Failed to add items to cart", e))?;

    tracing::info!(
        request_id = %req_id.0,
        cart_id = %cart.id,
        lines = request.items.len(),
        "created cart"
    );
    Ok(Json(AddToCartResponse { cart }))
}
