pub mod client;
pub mod error;
pub mod normalize;
mod queries;
mod rate_limit;
pub mod types;

pub use client::StorefrontClient;
pub use error::ShopifyError;
pub use normalize::{color_variants, normalize_product};
pub use types::{Cart, CartCost, Money, ProductRef, ProductVariants, UserError};
