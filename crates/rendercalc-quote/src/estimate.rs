//! Component quantities and costs for a wall area.

use rendercalc_core::{Catalog, Component, System};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::QuoteError;
use crate::live::LivePriceTable;
use crate::price::resolve_price;

/// A catalog component with its quantity and price worked out for an area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedComponent {
    pub key: String,
    pub name: String,
    pub product_handle: String,
    pub unit: String,
    pub has_color_variants: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub coverage_per_unit: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub components: Vec<ResolvedComponent>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
}

/// Whole units needed to cover `area`: `ceil(area / coverage)`.
///
/// # Errors
///
/// Returns [`QuoteError`] when either input is not positive or the result
/// does not fit in a `u32`.
pub fn units_for_area(area: Decimal, coverage: Decimal) -> Result<u32, QuoteError> {
    if area <= Decimal::ZERO {
        return Err(QuoteError::InvalidArea(area));
    }
    if coverage <= Decimal::ZERO {
        return Err(QuoteError::InvalidCoverage(coverage));
    }
    area.checked_div(coverage)
        .map(|units| units.ceil())
        .and_then(|units| units.to_u32())
        .ok_or(QuoteError::QuantityOverflow { area, coverage })
}

fn resolve_component(
    catalog: &Catalog,
    component: &Component,
    area: Decimal,
    live: &LivePriceTable,
) -> Result<ResolvedComponent, QuoteError> {
    let quantity = units_for_area(area, component.coverage_per_unit)?;
    let unit_price = resolve_price(catalog, &component.product_handle, live, None);
    Ok(ResolvedComponent {
        key: component.key.clone(),
        name: component.name.clone(),
        product_handle: component.product_handle.clone(),
        unit: component.unit.clone(),
        has_color_variants: component.has_color_variants,
        coverage_per_unit: component.coverage_per_unit,
        quantity,
        unit_price,
        line_total: Decimal::from(quantity) * unit_price,
    })
}

/// Quantities, unit prices and line totals for every component of `system`.
///
/// # Errors
///
/// Returns [`QuoteError::InvalidArea`] if `area` is not positive.
pub fn estimate(
    catalog: &Catalog,
    system: &System,
    area: Decimal,
    live: &LivePriceTable,
) -> Result<Estimate, QuoteError> {
    let components = system
        .components
        .iter()
        .map(|component| resolve_component(catalog, component, area, live))
        .collect::<Result<Vec<_>, _>>()?;
    let total_cost = components.iter().map(|c| c.line_total).sum();
    Ok(Estimate {
        components,
        total_cost,
    })
}

/// Cost per square metre, or zero for a non-positive area.
#[must_use]
pub fn price_per_square_metre(total: Decimal, area: Decimal) -> Decimal {
    if area <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    total.checked_div(area).unwrap_or(Decimal::ZERO)
}
