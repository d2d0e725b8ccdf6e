use rust_decimal::Decimal;
use thiserror::Error;

use crate::wizard::Step;

#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("area must be greater than zero, got {0}")]
    InvalidArea(Decimal),

    #[error("coverage must be greater than zero, got {0}")]
    InvalidCoverage(Decimal),

    #[error("quantity for {area} m2 at {coverage} m2 per unit does not fit in a u32")]
    QuantityOverflow { area: Decimal, coverage: Decimal },

    #[error("unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("substrate '{substrate}' is not offered for project type '{project_type}'")]
    UnknownSubstrate {
        project_type: String,
        substrate: String,
    },

    #[error("system {brand}/{system} is not among the current offers")]
    UnknownSystem { brand: String, system: String },

    #[error("unknown beading item: {0}")]
    UnknownBeading(String),

    #[error("unknown accessory: {0}")]
    UnknownAccessory(String),

    #[error("unknown colour: {0}")]
    UnknownColor(String),

    #[error("area-based accessory '{0}' has no coverage_per_unit")]
    MissingCoverage(String),

    #[error("{action} is not allowed at step {step}")]
    InvalidTransition { action: &'static str, step: Step },
}
