//! Unit price resolution: live storefront price first, static catalog price
//! second, zero last.

use rendercalc_core::Catalog;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::live::LivePriceTable;

/// Live price for `handle`, preferring `variant_id` when it names one of the
/// product's variants.
fn live_price(live: &LivePriceTable, handle: &str, variant_id: Option<&str>) -> Option<Decimal> {
    let product = live.get(handle)?;
    let price = product.price?;
    variant_id
        .and_then(|id| product.variant(id))
        .map_or(Some(price), |variant| Some(variant.price))
}

/// Resolve the unit price of a system component.
///
/// Falls back to the first catalog component sold under `handle`. An unknown
/// handle resolves to zero, which callers must treat as "price unknown" and
/// not as free.
#[must_use]
pub fn resolve_price(
    catalog: &Catalog,
    handle: &str,
    live: &LivePriceTable,
    variant_id: Option<&str>,
) -> Decimal {
    if let Some(price) = live_price(live, handle, variant_id) {
        return price;
    }
    if let Some(component) = catalog.component_by_handle(handle) {
        return component.static_price;
    }
    tracing::warn!(handle, "no live or static price for handle");
    Decimal::ZERO
}

/// Resolve the unit price of a beading or accessory item, falling back to the
/// item's own static price.
#[must_use]
pub fn resolve_item_price(
    handle: &str,
    static_price: Decimal,
    live: &LivePriceTable,
    variant_id: Option<&str>,
) -> Decimal {
    live_price(live, handle, variant_id).unwrap_or(static_price)
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "GBP" => Some("£"),
        "EUR" => Some("€"),
        "USD" => Some("$"),
        _ => None,
    }
}

/// Format a money amount to two decimals, e.g. `£72.50` or `CHF 72.50`.
#[must_use]
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    match currency_symbol(currency) {
        Some(symbol) => format!("{symbol}{rounded:.2}"),
        None => format!("{currency} {rounded:.2}"),
    }
}

/// Listing price for `handle`: `"from £x.xx"` when the live product's
/// colour variants are priced differently, otherwise `"£x.xx"`.
#[must_use]
pub fn display_price(catalog: &Catalog, handle: &str, live: &LivePriceTable) -> String {
    let price = resolve_price(catalog, handle, live, None);
    let product = live.get(handle).filter(|p| p.price.is_some());
    let currency = product.map_or(catalog.currency.as_str(), |p| p.currency.as_str());
    let formatted = format_money(price, currency);
    if product.is_some_and(|p| p.show_from_price) {
        format!("from {formatted}")
    } else {
        formatted
    }
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
