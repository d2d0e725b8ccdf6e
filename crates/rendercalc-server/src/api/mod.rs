mod cart;
mod catalog;
mod products;
mod quote;
mod variants;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rendercalc_core::Catalog;
use rendercalc_shopify::{ShopifyError, StorefrontClient};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

const NOT_CONFIGURED_MESSAGE: &str =
    "Shopify configuration missing. Please set SHOPIFY_STORE_DOMAIN and SHOPIFY_STOREFRONT_ACCESS_TOKEN";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// `None` when the store domain or access token is not configured.
    pub storefront: Option<Arc<StorefrontClient>>,
}

impl AppState {
    /// The storefront client, or the "configuration missing" error.
    pub(super) fn storefront(&self) -> Result<&StorefrontClient, ApiError> {
        self.storefront.as_deref().ok_or_else(|| {
            tracing::error!("storefront request rejected: gateway not configured");
            ApiError::new("not_configured", NOT_CONFIGURED_MESSAGE)
        })
    }
}

/// Flat error body: `{"error": "...", "details": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    code: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct HealthData {
    status: &'static str,
    storefront: &'static str,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            error: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" | "user_errors" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a storefront failure to an API error under `message`.
///
/// Rejected cart lines become a 400 carrying the storefront's user errors;
/// everything else is logged and becomes a 500 with the cause in `details`.
pub(super) fn map_shopify_error(request_id: &str, message: &str, error: ShopifyError) -> ApiError {
    match error {
        ShopifyError::UserErrors(user_errors) => {
            tracing::warn!(request_id, count = user_errors.len(), "storefront user errors");
            ApiError::new("user_errors", message)
                .with_details(serde_json::to_value(user_errors).unwrap_or_default())
        }
        other => {
            tracing::error!(request_id, error = %other, "storefront request failed");
            ApiError::new("upstream_error", message)
                .with_details(serde_json::Value::String(other.to_string()))
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn gateway_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/products-by-handles", post(products::products_by_handles))
        .route(
            "/variants-by-handle/{handle}",
            get(variants::variants_by_handle),
        )
        .route("/cart/add", post(cart::add_to_cart))
        .route("/quote/recommendations", post(quote::recommendations))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/catalog/project-types", get(catalog::list_project_types));

    Router::new()
        .merge(public_routes)
        .merge(gateway_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        storefront: if state.storefront.is_some() {
            "configured"
        } else {
            "not_configured"
        },
    })
}

pub fn rate_limit_state(per_minute: usize) -> RateLimitState {
    RateLimitState::new(per_minute, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
