//! Catalog rule adjustment for custom option prices.

use std::sync::Arc;

use rust_decimal::Decimal;

use optrules_catalog::Product;
use optrules_core::Entity;

use crate::config::PricingConfig;
use crate::resolver::RuleResolver;
use crate::rule::RuleContext;

/// Computes the price a custom option should show once catalog rules apply.
///
/// `caller_tag` names the call site for diagnostics only; it must never change
/// the result.
pub trait CustomOptionPriceCalculator: Send + Sync {
    fn calculate(&self, product: &Product, raw_price: Decimal, is_percent: bool, caller_tag: &str) -> Decimal;
}

impl<T> CustomOptionPriceCalculator for Arc<T>
where
    T: CustomOptionPriceCalculator + ?Sized,
{
    fn calculate(&self, product: &Product, raw_price: Decimal, is_percent: bool, caller_tag: &str) -> Decimal {
        (**self).calculate(product, raw_price, is_percent, caller_tag)
    }
}

impl<T> CustomOptionPriceCalculator for &T
where
    T: CustomOptionPriceCalculator + ?Sized,
{
    fn calculate(&self, product: &Product, raw_price: Decimal, is_percent: bool, caller_tag: &str) -> Decimal {
        (**self).calculate(product, raw_price, is_percent, caller_tag)
    }
}

/// Applies the product's catalog rule discount to fixed option amounts.
///
/// A fixed amount is priced as the share of the discounted "product + option"
/// total that exceeds the discounted product alone:
///
/// ```text
/// adjusted = rules(regular + option) - rules(regular)
/// ```
///
/// Only when the rules actually lower the product price; otherwise the amount
/// is returned untouched. Percent amounts are never adjusted, and a missing or
/// unresolvable rule context leaves the amount untouched as well.
#[derive(Debug, Clone)]
pub struct CatalogRuleCalculator<R> {
    resolver: R,
    config: PricingConfig,
}

impl<R: RuleResolver> CatalogRuleCalculator<R> {
    pub fn new(resolver: R, config: PricingConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    fn rule_context(&self, product: &Product) -> Option<RuleContext> {
        match self.resolver.resolve(product) {
            Ok(Some(context)) if !context.is_empty() => Some(context),
            Ok(Some(_)) => {
                tracing::debug!("empty catalog rule context; option price left unchanged");
                None
            }
            Ok(None) => {
                tracing::debug!("no catalog rule context; option price left unchanged");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog rule lookup failed; option price left unchanged");
                None
            }
        }
    }
}

impl<R: RuleResolver> CustomOptionPriceCalculator for CatalogRuleCalculator<R> {
    fn calculate(&self, product: &Product, raw_price: Decimal, is_percent: bool, caller_tag: &str) -> Decimal {
        let span = tracing::debug_span!(
            "custom_option_price",
            caller = caller_tag,
            product_id = %Entity::id(product),
            sku = product.sku(),
        );
        let _guard = span.enter();

        if is_percent {
            return raw_price;
        }

        let Some(context) = self.rule_context(product) else {
            return raw_price;
        };

        let regular = product.regular_price();
        let Some(rule_price) = context.apply(regular) else {
            tracing::warn!(%regular, "catalog rule overflowed on product price; option price left unchanged");
            return raw_price;
        };
        if rule_price >= regular {
            tracing::debug!(%regular, %rule_price, "catalog rules do not discount product");
            return raw_price;
        }

        let Some(adjusted) = regular
            .checked_add(raw_price)
            .and_then(|total| context.apply(total))
            .and_then(|total| total.checked_sub(rule_price))
        else {
            tracing::warn!(%regular, %raw_price, "catalog rule overflowed on option price; option price left unchanged");
            return raw_price;
        };

        let adjusted = self.config.round(adjusted);
        tracing::debug!(%raw_price, %adjusted, "applied catalog rules to option price");
        adjusted
    }
}
