use thiserror::Error;

use crate::types::UserError;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by storefront (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from storefront: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("storefront GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("storefront returned no data for {operation}")]
    MissingData { operation: &'static str },

    #[error("storefront rejected the cart: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
