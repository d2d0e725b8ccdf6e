pub mod app_config;
pub mod catalog;
pub mod config;
pub mod products;

pub use app_config::{AppConfig, Environment, ShopifyCredentials};
pub use catalog::{
    load_catalog, parse_catalog, AccessoryCategory, AccessoryItem, BeadingItem, Brand, Catalog,
    Component, FallbackColor, Performance, ProjectType, RenderType, Substrate, System,
    TOPCOAT_KEY,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    CartLine, ColorVariant, LiveProduct, LiveVariant, ProductImage, SelectedOption,
    COLOR_OPTION_NAMES,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
