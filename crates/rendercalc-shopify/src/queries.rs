//! Storefront GraphQL documents and the product search string builder.

/// Matches `products(first: 50)` below; longer handle lists are split.
pub(crate) const PRODUCTS_PER_QUERY: usize = 50;

pub(crate) const PRODUCTS_BY_HANDLES: &str = r"
query ProductsByHandles($query: String!) {
  products(first: 50, query: $query) {
    edges {
      node {
        handle
        title
        productType
        priceRange {
          minVariantPrice { amount currencyCode }
          maxVariantPrice { amount currencyCode }
        }
        variants(first: 50) {
          edges {
            node {
              id
              title
              price { amount currencyCode }
              availableForSale
              selectedOptions { name value }
              image { url altText }
            }
          }
        }
        images(first: 10) {
          edges { node { url altText } }
        }
      }
    }
  }
}
";

pub(crate) const VARIANTS_BY_HANDLE: &str = r"
query VariantsByHandle($handle: String!) {
  productByHandle(handle: $handle) {
    title
    handle
    variants(first: 50) {
      edges {
        node {
          id
          title
          price { amount currencyCode }
          availableForSale
          selectedOptions { name value }
          image { url altText }
        }
      }
    }
  }
}
";

pub(crate) const CART_CREATE: &str = r"
mutation CartCreate($input: CartInput!) {
  cartCreate(input: $input) {
    cart {
      id
      checkoutUrl
      totalQuantity
      cost {
        totalAmount { amount currencyCode }
      }
    }
    userErrors { field message }
  }
}
";

/// Builds the product search string `handle:("a", "b")`.
///
/// Quotes and backslashes inside a handle are escaped so a handle cannot
/// break out of the search term.
pub(crate) fn handle_search(handles: &[String]) -> String {
    let terms = handles
        .iter()
        .map(|h| format!("\"{}\"", h.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("handle:({terms})")
}
