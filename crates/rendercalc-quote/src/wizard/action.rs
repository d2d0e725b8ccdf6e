use rendercalc_core::ColorVariant;
use rust_decimal::Decimal;

use crate::live::{LivePriceTable, Ticket};
use crate::selection::CartItem;

/// Everything that can happen to a wizard: user input and I/O results.
#[derive(Debug, Clone)]
pub enum Action {
    SelectProjectType(String),
    SelectSubstrate(String),
    /// Once systems are offered, the new area must be positive and every
    /// derived quantity is re-estimated.
    SetArea(Decimal),
    Next,
    Back,
    SelectSystem {
        brand_key: String,
        system_key: String,
    },
    /// Quantity `0` removes the item.
    SetBeading {
        id: String,
        quantity: u32,
    },
    SetAccessory {
        id: String,
        included: bool,
    },
    SelectColor(String),
    PricesLoaded {
        ticket: Ticket,
        products: LivePriceTable,
    },
    PricesFailed {
        ticket: Ticket,
        reason: String,
    },
    ColorsLoaded {
        handle: String,
        colors: Vec<ColorVariant>,
    },
    ColorsFailed {
        handle: String,
        reason: String,
    },
    AddToCart,
}

/// Work the caller must perform on the wizard's behalf. Results come back
/// as [`Action::PricesLoaded`] / [`Action::ColorsLoaded`] and their failure
/// counterparts.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchPrices { ticket: Ticket, handles: Vec<String> },
    FetchColors { handle: String },
    CartReady(CartItem),
}
