//! Accessory quantities, including greedy packing across live pack sizes.
//!
//! Area-based accessories sold in several pack sizes are packed largest-first:
//! take as many of the biggest pack as fit under the remaining area, move to
//! the next size down, and round the remainder up with one smallest pack. This
//! is a heuristic, not an optimal knapsack. The result is never dearer than
//! buying the smallest pack alone; when it would be, the smallest-only plan is
//! returned instead.

use rendercalc_core::{AccessoryItem, LiveVariant};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::QuoteError;
use crate::estimate::units_for_area;
use crate::live::LivePriceTable;
use crate::pack_size::{parse_pack_size, PackSize, DEFAULT_PACK_UNITS};
use crate::price::resolve_item_price;

/// `count` packs of one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackLine {
    /// Storefront variant to add to the cart, when known.
    pub variant_id: Option<String>,
    pub label: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Area one pack covers, when the item is area-based.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub coverage: Option<Decimal>,
}

impl PackLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleQuote {
    pub accessory_id: String,
    /// Total packs across all sizes.
    pub quantity: u32,
    pub packs: Vec<PackLine>,
    /// Undiscounted price of all packs.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// e.g. `"2 × 25kg + 1 × 10kg"`.
    pub breakdown: String,
}

impl BundleQuote {
    fn from_packs(accessory_id: &str, packs: Vec<PackLine>) -> Self {
        let quantity = packs.iter().map(|p| p.quantity).sum();
        let total_price = packs.iter().map(PackLine::line_total).sum();
        let breakdown = packs
            .iter()
            .map(|p| format!("{} × {}", p.quantity, p.label))
            .collect::<Vec<_>>()
            .join(" + ");
        Self {
            accessory_id: accessory_id.to_string(),
            quantity,
            packs,
            total_price,
            breakdown,
        }
    }

    /// Area covered by all packs that carry a coverage figure.
    #[must_use]
    pub fn coverage(&self) -> Decimal {
        self.packs
            .iter()
            .filter_map(|p| p.coverage.map(|c| c * Decimal::from(p.quantity)))
            .sum()
    }
}

/// A live variant with a parsed size and the area it covers.
#[derive(Debug, Clone)]
struct SizedPack<'a> {
    variant: &'a LiveVariant,
    size: PackSize,
    coverage: Decimal,
}

impl SizedPack<'_> {
    fn line(&self, quantity: u32) -> PackLine {
        PackLine {
            variant_id: Some(self.variant.id.clone()),
            label: self.size.to_string(),
            quantity,
            unit_price: self.variant.price,
            coverage: Some(self.coverage),
        }
    }
}

fn pack_units(item: &AccessoryItem) -> Vec<&str> {
    match item.pack_unit.as_deref() {
        Some(unit) => vec![unit],
        None => DEFAULT_PACK_UNITS.to_vec(),
    }
}

/// Purchasable variants with a parsable size, largest coverage first.
fn sized_packs<'a>(
    item: &AccessoryItem,
    base_coverage: Decimal,
    variants: &'a [LiveVariant],
) -> Vec<SizedPack<'a>> {
    let units = pack_units(item);
    let parsed: Vec<(&LiveVariant, PackSize)> = variants
        .iter()
        .filter(|v| v.available_for_sale)
        .filter_map(|v| parse_pack_size(&v.title, &units).map(|size| (v, size)))
        .collect();

    let Some(base_size) = item
        .base_pack_size
        .or_else(|| parsed.iter().map(|(_, size)| size.amount).min())
    else {
        return Vec::new();
    };

    let mut packs: Vec<SizedPack<'a>> = parsed
        .into_iter()
        .filter_map(|(variant, size)| {
            let coverage = base_coverage * size.amount.checked_div(base_size)?;
            Some(SizedPack {
                variant,
                size,
                coverage,
            })
        })
        .collect();
    packs.sort_by(|a, b| b.coverage.cmp(&a.coverage));
    packs
}

fn floor_u32(value: Decimal) -> u32 {
    value.floor().to_u32().unwrap_or(u32::MAX)
}

fn greedy_plan(packs: &[SizedPack<'_>], area: Decimal) -> Result<Vec<PackLine>, QuoteError> {
    let Some((smallest, larger)) = packs.split_last() else {
        return Ok(Vec::new());
    };

    let mut lines = Vec::new();
    let mut remaining = area;
    for pack in larger {
        if remaining < pack.coverage {
            continue;
        }
        let count = floor_u32(remaining / pack.coverage);
        remaining -= Decimal::from(count) * pack.coverage;
        lines.push(pack.line(count));
    }
    if remaining > Decimal::ZERO {
        lines.push(smallest.line(units_for_area(remaining, smallest.coverage)?));
    }
    Ok(lines)
}

fn packed_quote(
    item: &AccessoryItem,
    area: Decimal,
    packs: &[SizedPack<'_>],
) -> Result<BundleQuote, QuoteError> {
    let Some(smallest) = packs.last() else {
        return Err(QuoteError::MissingCoverage(item.id.clone()));
    };

    let greedy = BundleQuote::from_packs(&item.id, greedy_plan(packs, area)?);
    let smallest_only = BundleQuote::from_packs(
        &item.id,
        vec![smallest.line(units_for_area(area, smallest.coverage)?)],
    );

    if greedy.total_price > smallest_only.total_price {
        tracing::debug!(
            accessory = %item.id,
            greedy = %greedy.total_price,
            smallest_only = %smallest_only.total_price,
            "greedy packing dearer than smallest packs; using smallest only"
        );
        return Ok(smallest_only);
    }
    Ok(greedy)
}

/// Quantity and price of an accessory for a wall of `area` square metres.
///
/// Items that are not area-based are a single unit. Area-based items with
/// fewer than two live pack sizes use `ceil(area / coverage)` units.
///
/// # Errors
///
/// Returns [`QuoteError`] if `area` is not positive or an area-based item has
/// no coverage.
pub fn optimal_quantity(
    item: &AccessoryItem,
    area: Decimal,
    live: &LivePriceTable,
) -> Result<BundleQuote, QuoteError> {
    if area <= Decimal::ZERO {
        return Err(QuoteError::InvalidArea(area));
    }

    let product = live.get(&item.product_handle);
    let default_variant = product.and_then(|p| p.default_variant());
    let single = |quantity: u32, coverage: Option<Decimal>| {
        let unit_price = resolve_item_price(
            &item.product_handle,
            item.static_price,
            live,
            default_variant.map(|v| v.id.as_str()),
        );
        BundleQuote::from_packs(
            &item.id,
            vec![PackLine {
                variant_id: default_variant.map(|v| v.id.clone()),
                label: item.name.clone(),
                quantity,
                unit_price,
                coverage,
            }],
        )
    };

    if !item.area_based {
        return Ok(single(1, None));
    }

    let coverage = item
        .coverage_per_unit
        .filter(|c| *c > Decimal::ZERO)
        .ok_or_else(|| QuoteError::MissingCoverage(item.id.clone()))?;

    let packs = product.map_or_else(Vec::new, |p| sized_packs(item, coverage, &p.variants));
    if packs.len() < 2 {
        return Ok(single(units_for_area(area, coverage)?, Some(coverage)));
    }
    packed_quote(item, area, &packs)
}

#[cfg(test)]
#[path = "bundler_test.rs"]
mod tests;
