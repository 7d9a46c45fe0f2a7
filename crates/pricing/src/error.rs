//! Pricing-layer error model.

use thiserror::Error;

use optrules_core::DomainError;

pub type PricingResult<T> = Result<T, PricingError>;

/// Errors raised around (never inside) the option price calculation.
///
/// The calculator swallows these and returns the unadjusted price; they are
/// surfaced to hosts wiring the crate up (configuration, rule loading).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// The host's rule lookup failed.
    #[error("rule resolution failed: {0}")]
    Resolver(String),

    /// A configuration value was present but unusable.
    #[error("invalid configuration {key}: {message}")]
    Config { key: &'static str, message: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl PricingError {
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    pub fn config(key: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            key,
            message: message.into(),
        }
    }
}
