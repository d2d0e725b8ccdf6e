//! The user's in-progress choices and the cart items they become.

use chrono::{DateTime, Utc};
use rendercalc_core::{ColorVariant, TOPCOAT_KEY};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::bundler::BundleQuote;
use crate::scoring::RankedSystemOffer;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeadingLine {
    pub id: String,
    pub name: String,
    pub product_handle: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryLine {
    pub id: String,
    pub name: String,
    pub product_handle: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub bundle_discount: Decimal,
    pub bundle: BundleQuote,
}

impl AccessoryLine {
    /// Bundle price after the accessory's discount.
    #[must_use]
    pub fn discounted_total(&self) -> Decimal {
        self.bundle.total_price * (Decimal::ONE - self.bundle_discount)
    }
}

/// Everything chosen so far in one quoting session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub project_type_id: Option<String>,
    pub substrate_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub area: Option<Decimal>,
    pub selected_offer: Option<RankedSystemOffer>,
    pub beading: Vec<BeadingLine>,
    pub accessories: Vec<AccessoryLine>,
    pub color: Option<ColorVariant>,
}

impl Selection {
    /// Units of topcoat in the selected offer; zero without one.
    #[must_use]
    pub fn topcoat_quantity(&self) -> u32 {
        self.selected_offer
            .as_ref()
            .and_then(|offer| offer.component(TOPCOAT_KEY))
            .map_or(0, |topcoat| topcoat.quantity)
    }
}

/// A completed selection placed in the session cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub selection: Selection,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}
