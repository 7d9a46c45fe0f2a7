//! Pricing configuration (environment-driven, with dev defaults).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

pub const ENV_CURRENCY_PRECISION: &str = "PRICING_CURRENCY_PRECISION";
pub const ENV_PRICE_NOTICE_CLASS: &str = "PRICING_PRICE_NOTICE_CLASS";

const MAX_PRECISION: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Decimal places adjusted option prices are rounded to.
    pub currency_precision: u32,
    /// CSS class of the badge wrapped around formatted option prices.
    pub price_notice_class: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency_precision: 2,
            price_notice_class: "price-notice".to_string(),
        }
    }
}

impl PricingConfig {
    /// Load from process environment; unset keys keep their defaults.
    pub fn from_env() -> PricingResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, test map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PricingResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CURRENCY_PRECISION) {
            let precision: u32 = raw.trim().parse().map_err(|e| {
                PricingError::config(ENV_CURRENCY_PRECISION, format!("{raw:?} is not a number: {e}"))
            })?;
            if precision > MAX_PRECISION {
                return Err(PricingError::config(
                    ENV_CURRENCY_PRECISION,
                    format!("{precision} exceeds the maximum of {MAX_PRECISION}"),
                ));
            }
            config.currency_precision = precision;
        }

        if let Some(raw) = lookup(ENV_PRICE_NOTICE_CLASS) {
            let class = raw.trim();
            if class.is_empty() || class.chars().any(|c| c.is_whitespace() || c == '"') {
                return Err(PricingError::config(
                    ENV_PRICE_NOTICE_CLASS,
                    format!("{raw:?} is not a single CSS class name"),
                ));
            }
            config.price_notice_class = class.to_string();
        }

        Ok(config)
    }

    /// Round a monetary amount to the configured currency precision.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.currency_precision, RoundingStrategy::MidpointAwayFromZero)
    }
}
