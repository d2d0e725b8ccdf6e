//! End-to-end quoting against the shipped catalog.

use std::path::Path;

use rendercalc_core::{load_catalog, Catalog, ColorVariant, LiveProduct, LiveVariant};
use rendercalc_quote::{
    checkout_lines, find_compatible_systems, resolve_price, Action, Effect, LivePriceTable, Step,
    Wizard,
};
use rust_decimal::Decimal;

fn shipped_catalog() -> Catalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("catalog.yaml");
    load_catalog(&path).expect("shipped catalog should load")
}

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

fn single_variant_product(id: &str, price: &str) -> LiveProduct {
    LiveProduct {
        title: id.to_string(),
        product_type: None,
        price: Some(dec(price)),
        max_price: Some(dec(price)),
        has_color_variants: false,
        show_from_price: false,
        currency: "GBP".to_string(),
        variants: vec![LiveVariant {
            id: id.to_string(),
            title: "Default Title".to_string(),
            price: dec(price),
            available_for_sale: true,
            selected_options: vec![],
            image: None,
        }],
        images: vec![],
    }
}

fn drive(wizard: &mut Wizard, catalog: &Catalog, actions: Vec<Action>) -> Vec<Effect> {
    let mut effects = Vec::new();
    for action in actions {
        effects.extend(wizard.dispatch(catalog, action).expect("action accepted"));
    }
    effects
}

fn to_system_choice(area: &str) -> Vec<Action> {
    vec![
        Action::SelectProjectType("retrofit".to_string()),
        Action::Next,
        Action::SelectSubstrate("brick".to_string()),
        Action::SetArea(dec(area)),
        Action::Next,
    ]
}

#[test]
fn retrofit_brick_fifty_square_metres() {
    let catalog = shipped_catalog();
    let offers =
        find_compatible_systems(&catalog, "retrofit", "brick", dec("50"), &LivePriceTable::new())
            .expect("offers");

    assert!(!offers.is_empty());
    let top = &offers[0];
    assert!(top.is_recommended);
    assert_eq!(top.score, offers.iter().map(|o| o.score).max().unwrap());
    assert!(offers.iter().skip(1).all(|o| !o.is_recommended));
    assert!(offers.windows(2).all(|w| w[0].score >= w[1].score));

    let basecoat = top.component("basecoat").expect("basecoat");
    assert_eq!(basecoat.coverage_per_unit, dec("5"));
    assert_eq!(basecoat.quantity, 10);
}

#[test]
fn missing_live_entry_falls_back_to_static_price() {
    let catalog = shipped_catalog();
    let (_, system) = catalog.system("renderline", "silicone").expect("system");
    let basecoat = system.component("basecoat").expect("basecoat");
    assert_eq!(
        resolve_price(
            &catalog,
            &basecoat.product_handle,
            &LivePriceTable::new(),
            None
        ),
        basecoat.static_price
    );
}

#[test]
fn discounted_accessory_at_twenty_costs_eighteen() {
    let catalog = shipped_catalog();
    let table: LivePriceTable = [(
        "stainless-steel-trowel".to_string(),
        single_variant_product("trowel-variant", "20.00"),
    )]
    .into_iter()
    .collect();

    let mut wizard = Wizard::with_prices(table);
    let mut actions = to_system_choice("50");
    actions.push(Action::SelectSystem {
        brand_key: "facadepro".to_string(),
        system_key: "lime".to_string(),
    });
    actions.push(Action::SetAccessory {
        id: "stainless-trowel".to_string(),
        included: true,
    });
    drive(&mut wizard, &catalog, actions);

    assert_eq!(wizard.cost_breakdown().accessories, dec("18.00"));
}

#[test]
fn colour_adjustment_scales_with_topcoat_tubs() {
    let catalog = shipped_catalog();
    let mut wizard = Wizard::new();
    let mut actions = to_system_choice("60");
    actions.push(Action::SelectSystem {
        brand_key: "renderline".to_string(),
        system_key: "silicone".to_string(),
    });
    let effects = drive(&mut wizard, &catalog, actions);
    let handle = effects
        .iter()
        .find_map(|e| match e {
            Effect::FetchColors { handle } => Some(handle.clone()),
            _ => None,
        })
        .expect("colour fetch requested");

    drive(
        &mut wizard,
        &catalog,
        vec![
            Action::ColorsLoaded {
                handle,
                colors: vec![ColorVariant {
                    id: "gid://shopify/ProductVariant/2".to_string(),
                    name: "Anthracite".to_string(),
                    hex: None,
                    image: None,
                    price: Some(dec("77.50")),
                    price_adjustment: dec("5"),
                    available_for_sale: true,
                    variant_title: Some("Anthracite / 25kg".to_string()),
                }],
            },
            Action::SelectColor("gid://shopify/ProductVariant/2".to_string()),
        ],
    );

    assert_eq!(wizard.selection().topcoat_quantity(), 8);
    assert_eq!(wizard.cost_breakdown().color_surcharge, dec("40"));
}

#[test]
fn full_session_ends_in_cart_with_reset() {
    let catalog = shipped_catalog();
    let mut wizard = Wizard::new();
    let mut actions = to_system_choice("42.5");
    actions.extend([
        Action::SelectSystem {
            brand_key: "renderline".to_string(),
            system_key: "scratch".to_string(),
        },
        Action::ColorsFailed {
            handle: "renderline-monocouche-finish".to_string(),
            reason: "storefront unavailable".to_string(),
        },
        Action::Next,
        Action::SetBeading {
            id: "scratch-corner".to_string(),
            quantity: 6,
        },
        Action::Next,
        Action::SetAccessory {
            id: "bonding-adhesive".to_string(),
            included: true,
        },
        Action::Next,
        Action::SelectColor("cream".to_string()),
        Action::Next,
    ]);
    drive(&mut wizard, &catalog, actions);
    assert_eq!(wizard.step(), Step::Review);
    let total = wizard.total();
    assert!(total > Decimal::ZERO);

    let effects = drive(&mut wizard, &catalog, vec![Action::AddToCart]);
    let Some(Effect::CartReady(item)) = effects.first() else {
        panic!("expected a cart item, got {effects:?}");
    };
    assert_eq!(item.total, total);
    assert_eq!(wizard.step(), Step::ProjectType);
    assert_eq!(wizard.cart().len(), 1);

    // No live table: nothing can be added to a storefront cart.
    assert!(checkout_lines(item, wizard.live()).is_empty());
}
