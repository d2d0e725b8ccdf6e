use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use rendercalc_quote::{
    find_compatible_systems, rank_systems, LivePriceTable, QuoteError, RankedSystemOffer,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecommendationsRequest {
    project_type: String,
    substrate: String,
    area: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum PriceSource {
    Live,
    Static,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecommendationsResponse {
    price_source: PriceSource,
    offers: Vec<RankedSystemOffer>,
}

impl From<QuoteError> for ApiError {
    fn from(error: QuoteError) -> Self {
        ApiError::new("validation_error", error.to_string())
    }
}

/// Checks that the project type exists and offers the substrate.
fn validate_request(
    state: &AppState,
    request: &RecommendationsRequest,
) -> Result<(), QuoteError> {
    if state.catalog.project_type(&request.project_type).is_none() {
        return Err(QuoteError::UnknownProjectType(request.project_type.clone()));
    }
    if !state
        .catalog
        .substrates_for(&request.project_type)
        .iter()
        .any(|s| s.id == request.substrate)
    {
        return Err(QuoteError::UnknownSubstrate {
            project_type: request.project_type.clone(),
            substrate: request.substrate.clone(),
        });
    }
    Ok(())
}

/// Live prices for every component of the compatible systems, or `None`
/// when the storefront is unconfigured or fails.
async fn fetch_live_prices(
    state: &AppState,
    request_id: &str,
    substrate: &str,
) -> Option<LivePriceTable> {
    let storefront = state.storefront.as_deref()?;
    let mut handles: Vec<String> = rank_systems(&state.catalog, substrate)
        .into_iter()
        .flat_map(|(_, system, _)| system.components.iter().map(|c| c.product_handle.clone()))
        .collect();
    handles.sort();
    handles.dedup();

    match storefront.products_by_handles(&handles).await {
        Ok(table) => Some(table),
        Err(error) => {
            tracing::warn!(
                request_id,
                error = %error,
                "live prices unavailable, quoting static prices"
            );
            None
        }
    }
}

/// `POST /quote/recommendations`: ranked, priced systems for a substrate.
pub(super) async fn recommendations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<RecommendationsRequest>, JsonRejection>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new("bad_request", "Invalid quote request")
            .with_details(serde_json::Value::String(rejection.body_text()))
    })?;
    validate_request(&state, &request)?;

    let live = fetch_live_prices(&state, &req_id.0, &request.substrate).await;
    let price_source = if live.is_some() {
        PriceSource::Live
    } else {
        PriceSource::Static
    };
    let offers = find_compatible_systems(
        &state.catalog,
        &request.project_type,
        &request.substrate,
        request.area,
        &live.unwrap_or_default(),
    )?;

    tracing::info!(
        request_id = %req_id.0,
        project_type = %request.project_type,
        substrate = %request.substrate,
        offers = offers.len(),
        ?price_source,
        "served recommendations"
    );
    Ok(Json(RecommendationsResponse {
        price_source,
        offers,
    }))
}
