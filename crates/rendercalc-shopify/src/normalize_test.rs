use rendercalc_core::SelectedOption;
use rust_decimal::Decimal;

use super::*;
use crate::types::{Connection, Edge, Money, PriceRange};

fn money(amount: &str) -> Money {
    Money {
        amount: amount.parse().unwrap(),
        currency_code: "GBP".to_owned(),
    }
}

fn variant_node(id: &str, title: &str, price: &str, options: &[(&str, &str)]) -> VariantNode {
    VariantNode {
        id: id.to_owned(),
        title: title.to_owned(),
        price: money(price),
        available_for_sale: true,
        selected_options: options
            .iter()
            .map(|(name, value)| SelectedOption {
                name: (*name).to_owned(),
                value: (*value).to_owned(),
            })
            .collect(),
        image: None,
    }
}

fn product_node(variants: Vec<VariantNode>, min: &str, max: &str) -> ProductNode {
    ProductNode {
        handle: "renderline-silicone-topcoat".to_owned(),
        title: "Silicone Topcoat".to_owned(),
        product_type: Some(String::new()),
        price_range: PriceRange {
            min_variant_price: money(min),
            max_variant_price: money(max),
        },
        variants: Connection {
            edges: variants.into_iter().map(|node| Edge { node }).collect(),
        },
        images: Connection {
            edges: vec![Edge {
                node: ImageNode {
                    url: "https://cdn.example.com/topcoat.jpg".to_owned(),
                    alt_text: Some(String::new()),
                },
            }],
        },
    }
}

// ---------------------------------------------------------------------------
// normalize_product
// ---------------------------------------------------------------------------

#[test]
fn normalize_product_keys_by_handle() {
    let node = product_node(
        vec![variant_node("v1", "Default Title", "72.50", &[])],
        "72.50",
        "72.50",
    );
    let (handle, product) = normalize_product(node);
    assert_eq!(handle, "renderline-silicone-topcoat");
    assert_eq!(product.price, Some(Decimal::new(7250, 2)));
    assert_eq!(product.currency, "GBP");
    assert!(!product.has_color_variants);
    assert!(!product.show_from_price);
}

#[test]
fn normalize_product_flags_priced_colours_as_from_price() {
    let node = product_node(
        vec![
            variant_node("v1", "White", "72.50", &[("Colour", "White")]),
            variant_node("v2", "Anthracite", "77.50", &[("Colour", "Anthracite")]),
        ],
        "72.50",
        "77.50",
    );
    let (_, product) = normalize_product(node);
    assert!(product.has_color_variants);
    assert!(product.show_from_price);
    assert_eq!(product.max_price, Some(Decimal::new(7750, 2)));
}

#[test]
fn normalize_product_same_priced_colours_are_not_from_price() {
    let node = product_node(
        vec![
            variant_node("v1", "White", "72.50", &[("color", "White")]),
            variant_node("v2", "Cream", "72.50", &[("color", "Cream")]),
        ],
        "72.50",
        "72.50",
    );
    let (_, product) = normalize_product(node);
    assert!(product.has_color_variants);
    assert!(!product.show_from_price);
}

#[test]
fn normalize_product_without_variants_has_no_price() {
    let (_, product) = normalize_product(product_node(vec![], "0.0", "0.0"));
    assert!(product.price.is_none());
    assert!(product.max_price.is_none());
}

#[test]
fn normalize_product_drops_empty_strings() {
    let node = product_node(
        vec![variant_node("v1", "Default Title", "10", &[])],
        "10",
        "10",
    );
    let (_, product) = normalize_product(node);
    assert!(product.product_type.is_none());
    assert_eq!(product.images.len(), 1);
    assert!(product.images[0].alt_text.is_none());
}

// ---------------------------------------------------------------------------
// color_variants
// ---------------------------------------------------------------------------

#[test]
fn color_variants_price_against_cheapest_colour() {
    let variants: Vec<LiveVariant> = vec![
        variant_node("v0", "Primer", "10.00", &[]),
        variant_node("v1", "White / 25kg", "72.50", &[("Colour", "White")]),
        variant_node("v2", "Anthracite / 25kg", "77.50", &[("Colour", "Anthracite")]),
    ]
    .into_iter()
    .map(normalize_variant)
    .collect();

    let colors = color_variants(&variants);
    assert_eq!(colors.len(), 2);
    assert_eq!(colors[0].name, "White");
    assert_eq!(colors[0].price_adjustment, Decimal::ZERO);
    assert_eq!(colors[1].id, "v2");
    assert_eq!(colors[1].price_adjustment, Decimal::new(5, 0));
    assert_eq!(colors[1].variant_title.as_deref(), Some("Anthracite / 25kg"));
}

#[test]
fn color_variants_empty_without_colour_options() {
    let variants = vec![normalize_variant(variant_node(
        "v1",
        "25kg",
        "13.75",
        &[("Size", "25kg")],
    ))];
    assert!(color_variants(&variants).is_empty());
}
