//! Storefront GraphQL API response types.
//!
//! ## Observed shape
//!
//! ### Money
//! `amount` is a decimal **string** (`"72.50"`), never a number. It is
//! deserialized straight into `Decimal` so no float rounding creeps in.
//!
//! ### Connections
//! Lists come wrapped as `{ edges: [{ node: ... }] }`. [`Connection::nodes`]
//! unwraps them.
//!
//! ### `productByHandle`
//! `null` (not an error) when no product has the handle.
//!
//! ### `userErrors`
//! `cartCreate` reports rejected lines (unknown variant, bad quantity) as
//! `userErrors` with HTTP 200. `field` is a path such as
//! `["input", "lines", "0", "merchandiseId"]` and may be `null`.

use rendercalc_core::{ColorVariant, SelectedOption};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

impl<T> Connection<T> {
    pub fn nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub price: Money,
    pub available_for_sale: bool,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<ImageNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub product_type: Option<String>,
    pub price_range: PriceRange,
    pub variants: Connection<VariantNode>,
    #[serde(default)]
    pub images: Connection<ImageNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsData {
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct HandleProductNode {
    pub title: String,
    pub handle: String,
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductByHandleData {
    pub product_by_handle: Option<HandleProductNode>,
}

/// A storefront cart as returned by `cartCreate`, passed through to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: u32,
    pub cost: CartCost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartCreatePayload {
    pub cart: Option<Cart>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartCreateData {
    pub cart_create: CartCreatePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRef {
    pub title: String,
    pub handle: String,
}

/// Colour choices for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariants {
    pub product: ProductRef,
    pub color_variants: Vec<ColorVariant>,
}
