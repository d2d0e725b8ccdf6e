use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use rendercalc_core::{AppConfig, CartLine, LiveProduct};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ShopifyError;
use crate::normalize::{color_variants, normalize_product, normalize_variant};
use crate::queries::{
    handle_search, CART_CREATE, PRODUCTS_BY_HANDLES, PRODUCTS_PER_QUERY, VARIANTS_BY_HANDLE,
};
use crate::rate_limit::retry_with_backoff;
use crate::types::{
    Cart, CartCreateData, GraphQlResponse, ProductByHandleData, ProductRef, ProductVariants,
    ProductsData,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Client for the Shopify Storefront GraphQL API.
///
/// Every call is a POST of `{query, variables}` to a single endpoint. Throttling
/// (429), 5xx and transport failures are retried with exponential backoff up
/// to `max_retries` additional attempts.
pub struct StorefrontClient {
    client: Client,
    endpoint: String,
    access_token: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

/// GraphQL endpoint for a store domain and API version.
pub(crate) fn graphql_endpoint(store_domain: &str, api_version: &str) -> String {
    format!("https://{store_domain}/api/{api_version}/graphql.json")
}

impl StorefrontClient {
    /// Creates a client for `store_domain` with the given timeout, `User-Agent`
    /// and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        store_domain: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopifyError> {
        Self::with_endpoint(
            graphql_endpoint(store_domain, api_version),
            access_token,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client that posts to an explicit endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_endpoint(
        endpoint: String,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from application config, or `None` when the store
    /// domain or access token is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, ShopifyError> {
        let Some(credentials) = config.shopify_credentials() else {
            return Ok(None);
        };
        Self::new(
            &credentials.store_domain,
            &credentials.access_token,
            &config.shopify_api_version,
            config.shopify_timeout_secs,
            &config.shopify_user_agent,
            config.shopify_max_retries,
            config.shopify_retry_backoff_base_secs,
        )
        .map(Some)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one GraphQL operation and returns its `data`.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Value,
    ) -> Result<T, ShopifyError> {
        let body = json!({ "query": query, "variables": variables });

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let body = &body;
            async move {
                let response = self
                    .client
                    .post(&self.endpoint)
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .json(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(ShopifyError::RateLimited { retry_after_secs });
                }

                let text = response.text().await?;
                if !status.is_success() {
                    return Err(ShopifyError::UnexpectedStatus {
                        status: status.as_u16(),
                        body: text,
                    });
                }

                let parsed = serde_json::from_str::<GraphQlResponse<T>>(&text).map_err(|e| {
                    ShopifyError::Deserialize {
                        context: operation.to_owned(),
                        source: e,
                    }
                })?;
                if !parsed.errors.is_empty() {
                    return Err(ShopifyError::GraphQl(
                        parsed.errors.into_iter().map(|e| e.message).collect(),
                    ));
                }
                parsed.data.ok_or(ShopifyError::MissingData { operation })
            }
        })
        .await
    }

    /// Fetches the products with the given handles, keyed by handle.
    ///
    /// Handles with no matching product are simply absent from the map. An
    /// empty `handles` slice makes no request; more than 50 handles are
    /// fetched in consecutive queries of at most 50.
    ///
    /// # Errors
    ///
    /// Returns any transport, status or GraphQL error from the storefront.
    pub async fn products_by_handles(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, LiveProduct>, ShopifyError> {
        let mut products = HashMap::new();
        for chunk in handles.chunks(PRODUCTS_PER_QUERY) {
            let data: ProductsData = self
                .execute(
                    "products",
                    PRODUCTS_BY_HANDLES,
                    json!({ "query": handle_search(chunk) }),
                )
                .await?;
            products.extend(data.products.nodes().map(normalize_product));
        }

        if !handles.is_empty() {
            tracing::debug!(
                requested = handles.len(),
                queries = handles.len().div_ceil(PRODUCTS_PER_QUERY),
                found = products.len(),
                "fetched storefront products"
            );
        }
        Ok(products)
    }

    /// Fetches the colour variants of one product, or `None` when no product
    /// has the handle.
    ///
    /// # Errors
    ///
    /// Returns any transport, status or GraphQL error from the storefront.
    pub async fn variants_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<ProductVariants>, ShopifyError> {
        let data: ProductByHandleData = self
            .execute(
                "productByHandle",
                VARIANTS_BY_HANDLE,
                json!({ "handle": handle }),
            )
            .await?;

        Ok(data.product_by_handle.map(|product| {
            let variants: Vec<_> = product.variants.nodes().map(normalize_variant).collect();
            ProductVariants {
                product: ProductRef {
                    title: product.title,
                    handle: product.handle,
                },
                color_variants: color_variants(&variants),
            }
        }))
    }

    /// Creates a storefront cart holding `lines`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserErrors`] when the storefront rejects any
    /// line, [`ShopifyError::MissingData`] when it returns neither a cart nor
    /// errors, and any transport, status or GraphQL error otherwise.
    pub async fn create_cart(&self, lines: &[CartLine]) -> Result<Cart, ShopifyError> {
        let lines: Vec<Value> = lines
            .iter()
            .map(|line| json!({ "merchandiseId": line.variant_id, "quantity": line.quantity }))
            .collect();

        let data: CartCreateData = self
            .execute(
                "cartCreate",
                CART_CREATE,
                json!({ "input": { "lines": lines } }),
            )
            .await?;

        let payload = data.cart_create;
        if !payload.user_errors.is_empty() {
            tracing::warn!(
                errors = payload.user_errors.len(),
                "storefront rejected cart lines"
            );
            return Err(ShopifyError::UserErrors(payload.user_errors));
        }
        let cart = payload.cart.ok_or(ShopifyError::MissingData {
            operation: "cartCreate",
        })?;
        tracing::info!(
            cart_id = %cart.id,
            total_quantity = cart.total_quantity,
            "created storefront cart"
        );
        Ok(cart)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
