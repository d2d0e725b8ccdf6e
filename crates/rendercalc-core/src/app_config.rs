use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Store domain and Storefront API token, present only when both are configured.
#[derive(Clone, PartialEq, Eq)]
pub struct ShopifyCredentials {
    /// Bare store domain, e.g. `"render-systems.myshopify.com"`.
    pub store_domain: String,
    pub access_token: String,
}

impl std::fmt::Debug for ShopifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyCredentials")
            .field("store_domain", &self.store_domain)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub shopify_store_domain: Option<String>,
    pub shopify_access_token: Option<String>,
    pub shopify_api_version: String,
    pub shopify_timeout_secs: u64,
    pub shopify_user_agent: String,
    pub shopify_max_retries: u32,
    pub shopify_retry_backoff_base_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    /// Returns the Storefront credentials when both the domain and the token
    /// are set. A missing half means the live gateway is unavailable.
    #[must_use]
    pub fn shopify_credentials(&self) -> Option<ShopifyCredentials> {
        match (&self.shopify_store_domain, &self.shopify_access_token) {
            (Some(domain), Some(token)) => Some(ShopifyCredentials {
                store_domain: domain.clone(),
                access_token: token.clone(),
            }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("shopify_store_domain", &self.shopify_store_domain)
            .field(
                "shopify_access_token",
                &self.shopify_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("shopify_api_version", &self.shopify_api_version)
            .field("shopify_timeout_secs", &self.shopify_timeout_secs)
            .field("shopify_user_agent", &self.shopify_user_agent)
            .field("shopify_max_retries", &self.shopify_max_retries)
            .field(
                "shopify_retry_backoff_base_secs",
                &self.shopify_retry_backoff_base_secs,
            )
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
