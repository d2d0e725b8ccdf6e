//! Quote arithmetic and the quoting wizard.
//!
//! Everything here is synchronous and side-effect free apart from logging.
//! Live storefront I/O is performed by callers; the [`wizard`] asks for it by
//! returning [`wizard::Effect`]s and receives the results back as actions.

pub mod aggregate;
pub mod bundler;
pub mod checkout;
pub mod error;
pub mod estimate;
pub mod live;
pub mod pack_size;
pub mod price;
pub mod scoring;
pub mod selection;
pub mod wizard;

#[cfg(test)]
mod test_support;

pub use aggregate::{cost_breakdown, total_cost, CostBreakdown};
pub use bundler::{optimal_quantity, BundleQuote, PackLine};
pub use checkout::checkout_lines;
pub use error::QuoteError;
pub use estimate::{estimate, price_per_square_metre, units_for_area, Estimate, ResolvedComponent};
pub use live::{LivePriceTable, PriceFeed, Ticket};
pub use pack_size::{parse_pack_size, PackSize};
pub use price::{display_price, format_money, resolve_item_price, resolve_price};
pub use scoring::{find_compatible_systems, rank_systems, RankedSystemOffer};
pub use selection::{AccessoryLine, BeadingLine, CartItem, Selection};
pub use wizard::{Action, Effect, Field, Step, Wizard};
