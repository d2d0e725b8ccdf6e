//! Normalization from Storefront GraphQL shapes to [`rendercalc_core`] types.

use rendercalc_core::{ColorVariant, LiveProduct, LiveVariant, ProductImage};

use crate::types::{ImageNode, ProductNode, VariantNode};

fn normalize_image(image: ImageNode) -> ProductImage {
    ProductImage {
        url: image.url,
        alt_text: image.alt_text.filter(|s| !s.is_empty()),
    }
}

pub(crate) fn normalize_variant(variant: VariantNode) -> LiveVariant {
    LiveVariant {
        id: variant.id,
        title: variant.title,
        price: variant.price.amount,
        available_for_sale: variant.available_for_sale,
        selected_options: variant.selected_options,
        image: variant.image.map(normalize_image),
    }
}

/// Normalizes a product node into its handle and a [`LiveProduct`].
///
/// `price` and `max_price` come from the product's price range and are
/// `None` when it has no variants. A product reads "from £x" only when it
/// has colour variants that are not all the same price.
#[must_use]
pub fn normalize_product(product: ProductNode) -> (String, LiveProduct) {
    let variants: Vec<LiveVariant> = product.variants.nodes().map(normalize_variant).collect();
    let has_variants = !variants.is_empty();
    let has_color_variants = variants.iter().any(|v| v.color_name().is_some());

    let min = product.price_range.min_variant_price;
    let max = product.price_range.max_variant_price;
    let show_from_price = has_color_variants && min.amount != max.amount;

    let live = LiveProduct {
        title: product.title,
        product_type: product.product_type.filter(|s| !s.is_empty()),
        price: has_variants.then_some(min.amount),
        max_price: has_variants.then_some(max.amount),
        has_color_variants,
        show_from_price,
        currency: min.currency_code,
        variants,
        images: product.images.nodes().map(normalize_image).collect(),
    };
    (product.handle, live)
}

/// Colour choices among `variants`.
///
/// Only variants with a colour option are returned. Each one's
/// `price_adjustment` is its premium over the cheapest colour variant.
#[must_use]
pub fn color_variants(variants: &[LiveVariant]) -> Vec<ColorVariant> {
    let colored: Vec<(&LiveVariant, &str)> = variants
        .iter()
        .filter_map(|v| v.color_name().map(|name| (v, name)))
        .collect();
    let Some(min_price) = colored.iter().map(|(v, _)| v.price).min() else {
        return Vec::new();
    };

    colored
        .into_iter()
        .map(|(variant, name)| ColorVariant {
            id: variant.id.clone(),
            name: name.to_owned(),
            hex: None,
            image: variant.image.clone(),
            price: Some(variant.price),
            price_adjustment: variant.price - min_price,
            available_for_sale: variant.available_for_sale,
            variant_title: Some(variant.title.clone()),
        })
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
