//! Selection totals, split into their terms.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::selection::Selection;

/// The terms of a selection's total. `total` is always their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub system: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub beading: Decimal,
    /// Accessories after bundle discounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub accessories: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub color_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Price the selection from scratch. Nothing is cached between calls.
#[must_use]
pub fn cost_breakdown(selection: &Selection) -> CostBreakdown {
    let system = selection
        .selected_offer
        .as_ref()
        .map_or(Decimal::ZERO, |offer| offer.total_cost);
    let beading = selection.beading.iter().map(|b| b.line_total).sum();
    let accessories = selection
        .accessories
        .iter()
        .map(crate::selection::AccessoryLine::discounted_total)
        .sum();
    let color_surcharge = selection
        .color
        .as_ref()
        .filter(|color| color.price_adjustment > Decimal::ZERO)
        .map_or(Decimal::ZERO, |color| {
            color.price_adjustment * Decimal::from(selection.topcoat_quantity())
        });

    CostBreakdown {
        system,
        beading,
        accessories,
        color_surcharge,
        total: system + beading + accessories + color_surcharge,
    }
}

#[must_use]
pub fn total_cost(selection: &Selection) -> Decimal {
    cost_breakdown(selection).total
}

#[cfg(test)]
mod tests {
    use rendercalc_core::ColorVariant;

    use super::*;
    use crate::bundler::optimal_quantity;
    use crate::live::LivePriceTable;
    use crate::scoring::find_compatible_systems;
    use crate::selection::{AccessoryLine, BeadingLine};
    use crate::test_support::{catalog, dec};

    fn selection() -> Selection {
        let catalog = catalog();
        let offer = find_compatible_systems(
            &catalog,
            "retrofit",
            "brick",
            dec("60"),
            &LivePriceTable::new(),
        )
        .unwrap()
        .remove(0);
        let trowel = catalog.accessory("trowel").unwrap();
        Selection {
            project_type_id: Some("retrofit".to_string()),
            substrate_id: Some("brick".to_string()),
            area: Some(dec("60")),
            selected_offer: Some(offer),
            beading: vec![BeadingLine {
                id: "corner".to_string(),
                name: "Corner Bead".to_string(),
                product_handle: "thin-corner".to_string(),
                quantity: 4,
                unit_price: dec("3.20"),
                line_total: dec("12.80"),
            }],
            accessories: vec![AccessoryLine {
                id: trowel.id.clone(),
                name: trowel.name.clone(),
                product_handle: trowel.product_handle.clone(),
                bundle_discount: trowel.discount(),
                bundle: optimal_quantity(trowel, dec("60"), &LivePriceTable::new()).unwrap(),
            }],
            color: None,
        }
    }

    fn color(adjustment: &str) -> ColorVariant {
        ColorVariant {
            id: "anthracite".to_string(),
            name: "Anthracite".to_string(),
            hex: None,
            image: None,
            price: None,
            price_adjustment: dec(adjustment),
            available_for_sale: true,
            variant_title: None,
        }
    }

    #[test]
    fn empty_selection_costs_nothing() {
        assert_eq!(total_cost(&Selection::default()), Decimal::ZERO);
    }

    #[test]
    fn accessory_discount_is_applied() {
        let breakdown = cost_breakdown(&selection());
        assert_eq!(breakdown.accessories, dec("18.00"));
    }

    #[test]
    fn colour_surcharge_scales_with_topcoat_quantity() {
        let mut selection = selection();
        // 60 m2 at 8 m2 per tub.
        assert_eq!(selection.topcoat_quantity(), 8);
        selection.color = Some(color("5"));
        assert_eq!(cost_breakdown(&selection).color_surcharge, dec("40"));
    }

    #[test]
    fn zero_adjustment_colour_adds_nothing() {
        let mut selection = selection();
        selection.color = Some(color("0"));
        assert_eq!(cost_breakdown(&selection).color_surcharge, Decimal::ZERO);
    }

    #[test]
    fn total_is_sum_of_terms() {
        let mut selection = selection();
        selection.color = Some(color("5"));
        let b = cost_breakdown(&selection);
        assert_eq!(b.total, b.system + b.beading + b.accessories + b.color_surcharge);
        // basecoat 12 x 18.50 + topcoat 8 x 72 = 798.
        assert_eq!(b.system, dec("798"));
        assert_eq!(b.total, dec("798") + dec("12.80") + dec("18") + dec("40"));
    }

    #[test]
    fn changing_one_field_changes_only_its_term() {
        let base = selection();
        let before = cost_breakdown(&base);

        let mut more_beading = base.clone();
        more_beading.beading[0].quantity = 5;
        more_beading.beading[0].line_total = dec("16.00");
        let after = cost_breakdown(&more_beading);

        assert_eq!(after.system, before.system);
        assert_eq!(after.accessories, before.accessories);
        assert_eq!(after.color_surcharge, before.color_surcharge);
        assert_eq!(after.total - before.total, after.beading - before.beading);
    }
}
