use rendercalc_core::Catalog;
use rendercalc_quote::{format_money, Wizard};

/// Prints the review step: system components, extras and the cost breakdown.
pub(super) fn print_quote(catalog: &Catalog, wizard: &Wizard) {
    let money = |amount| format_money(amount, &catalog.currency);
    let selection = wizard.selection();
    let Some(offer) = &selection.selected_offer else {
        println!("no system selected");
        return;
    };

    let area = selection.area.unwrap_or_default();
    println!(
        "{} {} ({}), {area} m2, score {}{}",
        offer.brand_name,
        offer.system_name,
        offer.render_type,
        offer.score,
        if offer.is_recommended {
            ", recommended"
        } else {
            ""
        }
    );
    println!();
    println!("{:<34}{:>6}  {:<10}{:>12}{:>12}", "COMPONENT", "QTY", "UNIT", "EACH", "TOTAL");
    for component in &offer.components {
        println!(
            "{:<34}{:>6}  {:<10}{:>12}{:>12}",
            component.name,
            component.quantity,
            component.unit,
            money(component.unit_price),
            money(component.line_total)
        );
    }

    if !selection.beading.is_empty() {
        println!();
        for bead in &selection.beading {
            println!(
                "{:<34}{:>6}  {:<10}{:>12}{:>12}",
                bead.name,
                bead.quantity,
                "length",
                money(bead.unit_price),
                money(bead.line_total)
            );
        }
    }

    if !selection.accessories.is_empty() {
        println!();
        for accessory in &selection.accessories {
            println!(
                "{:<34}{:>6}  {:<22}{:>12}",
                accessory.name,
                accessory.bundle.quantity,
                accessory.bundle.breakdown,
                money(accessory.discounted_total())
            );
        }
    }

    if let Some(color) = &selection.color {
        println!();
        println!("Colour: {}", color.name);
    }

    let costs = wizard.cost_breakdown();
    println!();
    println!("{:<20}{:>12}", "System", money(costs.system));
    println!("{:<20}{:>12}", "Beading", money(costs.beading));
    println!("{:<20}{:>12}", "Accessories", money(costs.accessories));
    if !costs.color_surcharge.is_zero() {
        println!("{:<20}{:>12}", "Colour surcharge", money(costs.color_surcharge));
    }
    println!("{:<20}{:>12}", "Total", money(costs.total));
    println!(
        "{:<20}{:>12}",
        "Per m2",
        money(wizard.price_per_square_metre())
    );
}
