use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Option names (compared case-insensitively) that mark a variant as a colour choice.
pub const COLOR_OPTION_NAMES: [&str; 2] = ["color", "colour"];

/// A product as currently listed on the storefront, normalized from the
/// Storefront API for price lookups and serialized back out to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveProduct {
    pub title: String,
    #[serde(default)]
    pub product_type: Option<String>,
    /// Cheapest variant price. `None` only when the product has no variants.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_price: Option<Decimal>,
    pub has_color_variants: bool,
    /// `true` when colour variants are priced differently, so listings
    /// should read "from £x".
    pub show_from_price: bool,
    pub currency: String,
    pub variants: Vec<LiveVariant>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl LiveProduct {
    #[must_use]
    pub fn variant(&self, id: &str) -> Option<&LiveVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// First variant that can be bought, else the first variant at all.
    #[must_use]
    pub fn default_variant(&self) -> Option<&LiveVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveVariant {
    /// Storefront global ID, e.g. `"gid://shopify/ProductVariant/123"`.
    pub id: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub available_for_sale: bool,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<ProductImage>,
}

impl LiveVariant {
    /// Value of this variant's colour option, if it has one.
    #[must_use]
    pub fn color_name(&self) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|o| {
                COLOR_OPTION_NAMES
                    .iter()
                    .any(|name| o.name.eq_ignore_ascii_case(name))
            })
            .map(|o| o.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A selectable topcoat colour. `price_adjustment` is the premium over the
/// cheapest colour of the same product, charged per unit of topcoat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorVariant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default)]
    pub image: Option<ProductImage>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_adjustment: Decimal,
    #[serde(rename = "availableForSale", default = "default_available")]
    pub available_for_sale: bool,
    #[serde(rename = "variantTitle", default, skip_serializing_if = "Option::is_none")]
    pub variant_title: Option<String>,
}

fn default_available() -> bool {
    true
}

/// One line of a storefront cart: a purchasable variant and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub variant_id: String,
    pub quantity: u32,
}

impl From<&crate::catalog::FallbackColor> for ColorVariant {
    fn from(color: &crate::catalog::FallbackColor) -> Self {
        Self {
            id: color.id.clone(),
            name: color.name.clone(),
            hex: color.hex.clone(),
            image: None,
            price: None,
            price_adjustment: Decimal::ZERO,
            available_for_sale: true,
            variant_title: None,
        }
    }
}
