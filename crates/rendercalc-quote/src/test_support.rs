//! Shared fixtures for unit tests.

use rendercalc_core::{parse_catalog, Catalog, LiveProduct, LiveVariant, SelectedOption};
use rust_decimal::Decimal;

use crate::live::LivePriceTable;

pub(crate) const FIXTURE: &str = r#"
brands:
  - key: acme
    name: Acme Render
    systems:
      - key: silicone
        name: Silicone Thin Coat
        suitable_substrates: [brick, block]
        performance:
          durability: 9
          ease_of_application: 7
          cost_effectiveness: 6
          weather_resistance: 9
        components:
          - key: basecoat
            name: Basecoat
            product_handle: acme-basecoat
            static_price: 18.50
            coverage_per_unit: 5
            unit: bag
          - key: topcoat
            name: Silicone Topcoat
            product_handle: acme-topcoat
            static_price: 72.00
            coverage_per_unit: 8
            unit: tub
            has_color_variants: true
      - key: ewi
        name: Insulated Facade
        suitable_substrates: [eps]
        performance:
          durability: 10
          ease_of_application: 10
          cost_effectiveness: 10
          weather_resistance: 10
        components:
          - key: basecoat
            name: EWI Basecoat
            product_handle: acme-ewi-basecoat
            static_price: 20.00
            coverage_per_unit: 4
            unit: bag
  - key: bravo
    name: Bravo Coatings
    systems:
      - key: scratch
        name: Scratch Render
        render_type: scratch_render
        suitable_substrates: [brick]
        performance:
          durability: 8
          ease_of_application: 8
          cost_effectiveness: 8
          weather_resistance: 7
        components:
          - key: basecoat
            name: Scratch Base
            product_handle: bravo-base
            static_price: 14.00
            coverage_per_unit: 4
            unit: bag
          - key: topcoat
            name: Scratch Finish
            product_handle: bravo-finish
            static_price: 19.00
            coverage_per_unit: 4
            unit: bag
      - key: lime
        name: Lime Render
        suitable_substrates: [brick, stone]
        performance:
          durability: 5
          ease_of_application: 5
          cost_effectiveness: 5
          weather_resistance: 5
        components:
          - key: basecoat
            name: Lime Base
            product_handle: bravo-lime
            static_price: 21.00
            coverage_per_unit: 3
            unit: bag
project_types:
  - id: retrofit
    name: Retrofit
    substrates:
      - id: brick
        name: Brick
      - id: stone
        name: Stone
  - id: ewi
    name: External Wall Insulation
    substrates:
      - id: eps
        name: EPS Board
beading:
  thin_coat:
    - id: corner
      name: Corner Bead
      product_handle: thin-corner
      length: 2.5
      static_price: 3.20
      recommended: true
  scratch_render:
    - id: scratch-corner
      name: Scratch Corner Bead
      product_handle: scratch-corner
      length: 3.0
      static_price: 5.60
accessories:
  - key: reinforcement
    name: Reinforcement
    items:
      - id: mesh
        name: Mesh
        product_handle: mesh
        static_price: 20.00
        bundle_discount: 0.1
        area_based: true
        coverage_per_unit: 50
      - id: adhesive
        name: Adhesive
        product_handle: adhesive
        static_price: 13.75
        area_based: true
        coverage_per_unit: 4
        pack_unit: kg
        base_pack_size: 25
  - key: tools
    name: Tools
    items:
      - id: trowel
        name: Trowel
        product_handle: trowel
        static_price: 20.00
        bundle_discount: 0.1
"#;

pub(crate) fn catalog() -> Catalog {
    parse_catalog(FIXTURE).expect("fixture catalog should parse")
}

pub(crate) fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

pub(crate) fn variant(id: &str, title: &str, price: &str, available: bool) -> LiveVariant {
    LiveVariant {
        id: id.to_string(),
        title: title.to_string(),
        price: dec(price),
        available_for_sale: available,
        selected_options: vec![],
        image: None,
    }
}

pub(crate) fn color_variant(id: &str, color: &str, price: &str) -> LiveVariant {
    LiveVariant {
        selected_options: vec![SelectedOption {
            name: "Colour".to_string(),
            value: color.to_string(),
        }],
        ..variant(id, color, price, true)
    }
}

pub(crate) fn product(variants: Vec<LiveVariant>) -> LiveProduct {
    let min = variants.iter().map(|v| v.price).min();
    let max = variants.iter().map(|v| v.price).max();
    let has_color = variants.iter().any(|v| v.color_name().is_some());
    LiveProduct {
        title: "Live product".to_string(),
        product_type: None,
        price: min,
        max_price: max,
        has_color_variants: has_color,
        show_from_price: has_color && min != max,
        currency: "GBP".to_string(),
        variants,
        images: vec![],
    }
}

pub(crate) fn live(entries: Vec<(&str, LiveProduct)>) -> LivePriceTable {
    entries
        .into_iter()
        .map(|(handle, product)| (handle.to_string(), product))
        .collect()
}
