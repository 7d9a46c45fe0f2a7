//! Catalog price rules for custom option prices.
//!
//! Custom option amounts are normally excluded from catalog price rules. This
//! crate routes them through the same discount the rules give the product:
//!
//! - [`calculator`]: the rule-adjustment calculation (fails open).
//! - [`interception`]: one generic adapter around the host's option and
//!   option-value price accessors.
//! - [`formatter`]: the sign-prefixed, currency-rendered option price string.
//!
//! Rule storage, currency conversion and tax live in the host platform and are
//! reached through the traits in [`resolver`] and [`formatter`].

pub mod calculator;
pub mod config;
pub mod error;
pub mod formatter;
pub mod interception;
pub mod resolver;
pub mod rule;

pub use calculator::{CatalogRuleCalculator, CustomOptionPriceCalculator};
pub use config::PricingConfig;
pub use error::{PricingError, PricingResult};
pub use formatter::{
    AmountContext, AmountRenderer, CurrencyConverter, DefaultAmountRenderer, OptionsPriceFormatter,
    PricingValue, TaxPriceHelper,
};
pub use interception::{PriceInterceptor, PricedEntity};
pub use resolver::{InMemoryRuleResolver, RuleResolver};
pub use rule::{CatalogRule, RuleAction, RuleContext};
