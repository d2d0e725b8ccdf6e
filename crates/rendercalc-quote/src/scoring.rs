//! System compatibility scoring and ranking.

use rendercalc_core::{Brand, Catalog, RenderType, System};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::QuoteError;
use crate::estimate::{estimate, price_per_square_metre, ResolvedComponent};
use crate::live::LivePriceTable;

/// A compatible system with its score, rank flag and priced components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSystemOffer {
    pub brand_key: String,
    pub brand_name: String,
    pub system_key: String,
    pub system_name: String,
    pub description: String,
    pub render_type: RenderType,
    /// Sum of the four performance axes, 0-40.
    pub score: u32,
    pub is_recommended: bool,
    pub components: Vec<ResolvedComponent>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_square_metre: Decimal,
}

impl RankedSystemOffer {
    #[must_use]
    pub fn component(&self, key: &str) -> Option<&ResolvedComponent> {
        self.components.iter().find(|c| c.key == key)
    }

    /// Re-price against a fresh live table. Offers whose system has vanished
    /// from the catalog are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::InvalidArea`] if `area` is not positive.
    pub fn reestimate(
        &mut self,
        catalog: &Catalog,
        area: Decimal,
        live: &LivePriceTable,
    ) -> Result<(), QuoteError> {
        let Some((_, system)) = catalog.system(&self.brand_key, &self.system_key) else {
            tracing::warn!(
                brand = %self.brand_key,
                system = %self.system_key,
                "offer refers to a system missing from the catalog"
            );
            return Ok(());
        };
        let estimate = estimate(catalog, system, area, live)?;
        self.components = estimate.components;
        self.total_cost = estimate.total_cost;
        self.price_per_square_metre = price_per_square_metre(estimate.total_cost, area);
        Ok(())
    }
}

/// Systems suitable for `substrate_id`, highest score first.
///
/// The sort is stable, so equal scores keep catalog order.
#[must_use]
pub fn rank_systems<'a>(
    catalog: &'a Catalog,
    substrate_id: &str,
) -> Vec<(&'a Brand, &'a System, u32)> {
    let mut ranked: Vec<_> = catalog
        .systems()
        .filter(|(_, system)| system.supports_substrate(substrate_id))
        .map(|(brand, system)| (brand, system, system.performance.score()))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2));
    ranked
}

/// Ranked, priced offers for a substrate. Only the first offer is marked
/// recommended. An empty result means no compatible system.
///
/// The project type does not narrow the result; substrate suitability is
/// declared on the systems alone.
///
/// # Errors
///
/// Returns [`QuoteError::InvalidArea`] if `area` is not positive.
pub fn find_compatible_systems(
    catalog: &Catalog,
    project_type_id: &str,
    substrate_id: &str,
    area: Decimal,
    live: &LivePriceTable,
) -> Result<Vec<RankedSystemOffer>, QuoteError> {
    if area <= Decimal::ZERO {
        return Err(QuoteError::InvalidArea(area));
    }

    let offers = rank_systems(catalog, substrate_id)
        .into_iter()
        .enumerate()
        .map(|(rank, (brand, system, score))| {
            let estimate = estimate(catalog, system, area, live)?;
            Ok(RankedSystemOffer {
                brand_key: brand.key.clone(),
                brand_name: brand.name.clone(),
                system_key: system.key.clone(),
                system_name: system.name.clone(),
                description: system.description.clone(),
                render_type: system.render_type,
                score,
                is_recommended: rank == 0,
                price_per_square_metre: price_per_square_metre(estimate.total_cost, area),
                total_cost: estimate.total_cost,
                components: estimate.components,
            })
        })
        .collect::<Result<Vec<_>, QuoteError>>()?;

    if offers.is_empty() {
        tracing::info!(
            project_type = project_type_id,
            substrate = substrate_id,
            "no compatible system"
        );
    } else {
        tracing::debug!(
            project_type = project_type_id,
            substrate = substrate_id,
            offers = offers.len(),
            "ranked compatible systems"
        );
    }

    Ok(offers)
}
