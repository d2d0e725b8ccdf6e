use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it in tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup; no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so an empty line in `.env` does not
    // half-enable the gateway.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("RENDERCALC_ENV", "development"))?;

    let bind_addr = parse("RENDERCALC_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RENDERCALC_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "RENDERCALC_CATALOG_PATH",
        "./config/catalog.yaml",
    ));

    let shopify_store_domain = optional("SHOPIFY_STORE_DOMAIN").map(|d| normalize_domain(&d));
    let shopify_access_token = optional("SHOPIFY_STOREFRONT_ACCESS_TOKEN");
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2023-10");

    let shopify_timeout_secs = parse_u64("RENDERCALC_SHOPIFY_TIMEOUT_SECS", "30")?;
    let shopify_user_agent = or_default(
        "RENDERCALC_SHOPIFY_USER_AGENT",
        "rendercalc/0.1 (quote-calculator)",
    );
    let shopify_max_retries = parse_u32("RENDERCALC_SHOPIFY_MAX_RETRIES", "2")?;
    let shopify_retry_backoff_base_secs =
        parse_u64("RENDERCALC_SHOPIFY_RETRY_BACKOFF_BASE_SECS", "1")?;

    let rate_limit_per_minute = parse_usize("RENDERCALC_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RENDERCALC_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        shopify_store_domain,
        shopify_access_token,
        shopify_api_version,
        shopify_timeout_secs,
        shopify_user_agent,
        shopify_max_retries,
        shopify_retry_backoff_base_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RENDERCALC_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

/// Strips a scheme and trailing slashes so `https://shop.example.com/` and
/// `shop.example.com` configure the same store.
fn normalize_domain(raw: &str) -> String {
    raw.strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
