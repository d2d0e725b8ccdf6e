//! Turning a cart item into storefront cart lines.

use rendercalc_core::{CartLine, TOPCOAT_KEY};

use crate::live::LivePriceTable;
use crate::selection::CartItem;

fn default_variant_id(live: &LivePriceTable, handle: &str) -> Option<String> {
    live.get(handle)
        .and_then(|p| p.default_variant())
        .map(|v| v.id.clone())
}

fn push_line(lines: &mut Vec<CartLine>, variant_id: Option<String>, quantity: u32, handle: &str) {
    if quantity == 0 {
        return;
    }
    let Some(variant_id) = variant_id else {
        tracing::warn!(handle, "no live variant for product; leaving it out of the cart");
        return;
    };
    match lines.iter_mut().find(|l| l.variant_id == variant_id) {
        Some(existing) => existing.quantity += quantity,
        None => lines.push(CartLine {
            variant_id,
            quantity,
        }),
    }
}

/// Cart lines for every product in `item`, resolved against the live table.
///
/// The topcoat uses the chosen colour's variant when that colour is a live
/// variant; everything else uses its first purchasable variant. Each packed
/// accessory size is its own line. Products with no live variant are skipped.
#[must_use]
pub fn checkout_lines(item: &CartItem, live: &LivePriceTable) -> Vec<CartLine> {
    let selection = &item.selection;
    let mut lines = Vec::new();

    if let Some(offer) = &selection.selected_offer {
        for component in &offer.components {
            let color_variant = selection
                .color
                .as_ref()
                .filter(|_| component.key == TOPCOAT_KEY)
                .and_then(|color| {
                    live.get(&component.product_handle)
                        .and_then(|p| p.variant(&color.id))
                })
                .map(|v| v.id.clone());
            let variant_id =
                color_variant.or_else(|| default_variant_id(live, &component.product_handle));
            push_line(
                &mut lines,
                variant_id,
                component.quantity,
                &component.product_handle,
            );
        }
    }

    for bead in &selection.beading {
        push_line(
            &mut lines,
            default_variant_id(live, &bead.product_handle),
            bead.quantity,
            &bead.product_handle,
        );
    }

    for accessory in &selection.accessories {
        for pack in &accessory.bundle.packs {
            let variant_id = pack
                .variant_id
                .clone()
                .or_else(|| default_variant_id(live, &accessory.product_handle));
            push_line(&mut lines, variant_id, pack.quantity, &accessory.product_handle);
        }
    }

    lines
}
