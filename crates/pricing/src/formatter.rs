//! Option price strings for product option templates.
//!
//! The formatter is the display-side entry into the calculator: fixed option
//! amounts are rule-adjusted before the host renders them, so the price notice
//! next to an option matches what checkout will charge.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use optrules_catalog::{CustomOption, Product};

use crate::calculator::CustomOptionPriceCalculator;
use crate::config::PricingConfig;
use crate::interception::PriceInterceptor;

const CALLER_TAG: &str = "OptionsPriceFormatter";

/// Flags passed to the host renderer alongside an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmountContext {
    /// The amount belongs to a configurable option and has already been
    /// rule-adjusted; the renderer must not adjust it again.
    pub configuration_option: bool,
}

/// Host-side currency/amount renderer.
pub trait AmountRenderer: Send + Sync {
    fn render_amount(&self, amount: Decimal, product: &Product, context: &AmountContext) -> String;
}

/// Host-side tax helper.
pub trait TaxPriceHelper: Send + Sync {
    /// `including_tax: None` lets the host pick its display default.
    fn tax_price(&self, product: &Product, price: Decimal, including_tax: Option<bool>) -> Decimal;
}

/// Host-side store currency conversion. Nothing is converted in this crate.
pub trait CurrencyConverter: Send + Sync {
    fn currency_by_store(&self, price: Decimal, store_code: &str) -> Decimal;
}

/// Input to [`OptionsPriceFormatter::format_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingValue {
    pub is_percent: bool,
    pub pricing_value: Decimal,
}

impl PricingValue {
    pub fn fixed(pricing_value: Decimal) -> Self {
        Self {
            is_percent: false,
            pricing_value,
        }
    }

    pub fn percent(pricing_value: Decimal) -> Self {
        Self {
            is_percent: true,
            pricing_value,
        }
    }
}

/// Renders `<span class="price">£1,234.50</span>` using the product's currency.
#[derive(Debug, Clone)]
pub struct DefaultAmountRenderer {
    precision: u32,
}

impl DefaultAmountRenderer {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            precision: config.currency_precision,
        }
    }

    fn symbol(currency_code: &str) -> Option<&'static str> {
        match currency_code {
            "USD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "JPY" => Some("¥"),
            "INR" => Some("₹"),
            _ => None,
        }
    }

    fn group_thousands(digits: &str) -> String {
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    fn format_number(&self, amount: Decimal) -> String {
        let rounded = amount
            .abs()
            .round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.*}", self.precision as usize, rounded);
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (text.as_str(), None),
        };

        let mut out = String::new();
        if amount < Decimal::ZERO && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&Self::group_thousands(int_part));
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

impl Default for DefaultAmountRenderer {
    fn default() -> Self {
        Self::new(&PricingConfig::default())
    }
}

impl AmountRenderer for DefaultAmountRenderer {
    fn render_amount(&self, amount: Decimal, product: &Product, context: &AmountContext) -> String {
        tracing::trace!(%amount, configuration_option = context.configuration_option, "rendering amount");
        let number = self.format_number(amount);
        let currency = product.currency_code();
        let text = match Self::symbol(currency) {
            Some(symbol) => match number.strip_prefix('-') {
                Some(unsigned) => format!("-{symbol}{unsigned}"),
                None => format!("{symbol}{number}"),
            },
            None => format!("{currency} {number}"),
        };
        format!("<span class=\"price\">{text}</span>")
    }
}

/// Builds the price notice shown next to a product's custom options.
///
/// All collaborators are required at construction; there is no global
/// fallback lookup.
pub struct OptionsPriceFormatter {
    calculator: Arc<dyn CustomOptionPriceCalculator>,
    interceptor: PriceInterceptor<Arc<dyn CustomOptionPriceCalculator>>,
    renderer: Arc<dyn AmountRenderer>,
    tax_helper: Arc<dyn TaxPriceHelper>,
    currency: Arc<dyn CurrencyConverter>,
    config: PricingConfig,
    product: Arc<Product>,
    option: Option<CustomOption>,
}

impl OptionsPriceFormatter {
    pub fn new(
        calculator: Arc<dyn CustomOptionPriceCalculator>,
        renderer: Arc<dyn AmountRenderer>,
        tax_helper: Arc<dyn TaxPriceHelper>,
        currency: Arc<dyn CurrencyConverter>,
        config: PricingConfig,
        product: Arc<Product>,
    ) -> Self {
        Self {
            interceptor: PriceInterceptor::new(Arc::clone(&calculator)),
            calculator,
            renderer,
            tax_helper,
            currency,
            config,
            product,
            option: None,
        }
    }

    pub fn with_product(mut self, product: Arc<Product>) -> Self {
        self.product = product;
        self
    }

    pub fn with_option(mut self, option: CustomOption) -> Self {
        self.option = Some(option);
        self
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn option(&self) -> Option<&CustomOption> {
        self.option.as_ref()
    }

    /// Price notice for the bound option, or `""` when none is bound.
    pub fn formatted_price(&self) -> String {
        let Some(option) = &self.option else {
            return String::new();
        };

        let is_percent = option.price_type().is_percent();
        self.format_price(
            PricingValue {
                is_percent,
                pricing_value: self.interceptor.price(option, is_percent),
            },
            true,
        )
    }

    #[deprecated(note = "use `formatted_price`")]
    pub fn formated_price(&self) -> String {
        self.formatted_price()
    }

    /// Sign-prefixed, rendered amount; `""` for a zero amount.
    ///
    /// Fixed amounts are rule-adjusted by magnitude before rendering; percent
    /// amounts are rendered as given.
    pub fn format_price(&self, value: PricingValue, wrap_in_badge: bool) -> String {
        if value.pricing_value.is_zero() {
            return String::new();
        }

        let (sign, magnitude) = if value.pricing_value < Decimal::ZERO {
            ('-', -value.pricing_value)
        } else {
            ('+', value.pricing_value)
        };

        let amount = if value.is_percent {
            magnitude
        } else {
            self.calculator.calculate(&self.product, magnitude, false, CALLER_TAG)
        };

        let context = AmountContext {
            configuration_option: true,
        };
        let mut price = String::from(sign);
        price.push_str(&self.renderer.render_amount(amount, &self.product, &context));

        if wrap_in_badge {
            return format!("<span class=\"{}\">{price}</span>", self.config.price_notice_class);
        }
        price
    }

    #[deprecated(note = "use `format_price`")]
    pub fn format_price_legacy(&self, value: PricingValue, wrap_in_badge: bool) -> String {
        self.format_price(value, wrap_in_badge)
    }

    /// Tax-adjusted price. Any explicit choice asks the host for the
    /// tax-inclusive figure; `None` defers to the host's display setting.
    pub fn price(&self, price: Decimal, including_tax: Option<bool>) -> Decimal {
        let including_tax = including_tax.map(|_| true);
        self.tax_helper.tax_price(&self.product, price, including_tax)
    }

    /// Price in the currency of the product's store.
    pub fn currency_price(&self, price: Decimal) -> Decimal {
        self.currency.currency_by_store(price, self.product.store_code())
    }
}

impl core::fmt::Debug for OptionsPriceFormatter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OptionsPriceFormatter")
            .field("config", &self.config)
            .field("product", &self.product.id_typed())
            .field("option", &self.option.as_ref().map(|o| o.id_typed()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::calculator::CatalogRuleCalculator;
    use crate::resolver::InMemoryRuleResolver;
    use crate::rule::{CatalogRule, RuleAction, RuleContext};
    use optrules_catalog::PriceType;
    use optrules_core::{OptionId, ProductId, RuleId};
    use rust_decimal_macros::dec;

    struct HalfTax;

    impl TaxPriceHelper for HalfTax {
        fn tax_price(&self, _product: &Product, price: Decimal, including_tax: Option<bool>) -> Decimal {
            match including_tax {
                Some(true) => price * dec!(1.2),
                _ => price,
            }
        }
    }

    struct StoreRates;

    impl CurrencyConverter for StoreRates {
        fn currency_by_store(&self, price: Decimal, store_code: &str) -> Decimal {
            if store_code == "eu" { price * dec!(1.15) } else { price }
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        contexts: Mutex<Vec<(Decimal, AmountContext)>>,
    }

    impl AmountRenderer for RecordingRenderer {
        fn render_amount(&self, amount: Decimal, _product: &Product, context: &AmountContext) -> String {
            self.contexts.lock().unwrap().push((amount, *context));
            format!("{amount:.2}")
        }
    }

    fn product(currency: &str) -> Arc<Product> {
        Arc::new(Product::new(ProductId::new(), "BED-001", "Oak Bed", dec!(200), currency).unwrap())
    }

    fn formatter_with(
        product: Arc<Product>,
        rules: Option<RuleContext>,
        renderer: Arc<dyn AmountRenderer>,
    ) -> OptionsPriceFormatter {
        let mut resolver = InMemoryRuleResolver::new();
        if let Some(ctx) = rules {
            resolver.insert(product.id_typed(), ctx);
        }
        let config = PricingConfig::default();
        let calculator = Arc::new(CatalogRuleCalculator::new(resolver, config.clone()));
        OptionsPriceFormatter::new(
            calculator,
            renderer,
            Arc::new(HalfTax),
            Arc::new(StoreRates),
            config,
            product,
        )
    }

    fn twenty_percent_off() -> RuleContext {
        let rule = CatalogRule::new(RuleId::new(), "Sale", RuleAction::ByPercent, dec!(20)).unwrap();
        RuleContext::new(vec![rule]).unwrap()
    }

    #[test]
    fn zero_amount_renders_nothing() {
        let formatter = formatter_with(product("GBP"), None, Arc::new(DefaultAmountRenderer::default()));
        assert_eq!(formatter.format_price(PricingValue::fixed(Decimal::ZERO), true), "");
        assert_eq!(formatter.format_price(PricingValue::percent(Decimal::ZERO), false), "");
    }

    #[test]
    fn positive_fixed_amount_is_badged_with_plus_sign() {
        let formatter = formatter_with(product("GBP"), None, Arc::new(DefaultAmountRenderer::default()));
        assert_eq!(
            formatter.format_price(PricingValue::fixed(dec!(15)), true),
            "<span class=\"price-notice\">+<span class=\"price\">£15.00</span></span>"
        );
    }

    #[test]
    fn negative_fixed_amount_uses_minus_sign_and_magnitude() {
        let formatter = formatter_with(product("USD"), None, Arc::new(DefaultAmountRenderer::default()));
        assert_eq!(
            formatter.format_price(PricingValue::fixed(dec!(-5)), false),
            "-<span class=\"price\">$5.00</span>"
        );
    }

    #[test]
    fn fixed_amount_is_rule_adjusted_before_rendering() {
        let renderer = Arc::new(RecordingRenderer::default());
        let formatter = formatter_with(product("GBP"), Some(twenty_percent_off()), renderer.clone());

        assert_eq!(formatter.format_price(PricingValue::fixed(dec!(50)), false), "+40.00");
        let seen = renderer.contexts.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(dec!(40.00), AmountContext { configuration_option: true })]);
    }

    #[test]
    fn negative_amount_is_adjusted_by_magnitude() {
        let renderer = Arc::new(RecordingRenderer::default());
        let formatter = formatter_with(product("GBP"), Some(twenty_percent_off()), renderer);

        assert_eq!(formatter.format_price(PricingValue::fixed(dec!(-5)), false), "-4.00");
    }

    #[test]
    fn percent_amount_skips_calculator() {
        let renderer = Arc::new(RecordingRenderer::default());
        let formatter = formatter_with(product("GBP"), Some(twenty_percent_off()), renderer);

        assert_eq!(formatter.format_price(PricingValue::percent(dec!(10)), false), "+10.00");
    }

    #[test]
    fn badge_class_comes_from_config() {
        let product = product("EUR");
        let config = PricingConfig {
            price_notice_class: "option-price".to_string(),
            ..PricingConfig::default()
        };
        let calculator = Arc::new(CatalogRuleCalculator::new(InMemoryRuleResolver::new(), config.clone()));
        let formatter = OptionsPriceFormatter::new(
            calculator,
            Arc::new(DefaultAmountRenderer::new(&config)),
            Arc::new(HalfTax),
            Arc::new(StoreRates),
            config,
            product,
        );

        assert_eq!(
            formatter.format_price(PricingValue::fixed(dec!(1234.5)), true),
            "<span class=\"option-price\">+<span class=\"price\">€1,234.50</span></span>"
        );
    }

    #[test]
    #[allow(deprecated)]
    fn legacy_alias_matches_primary() {
        let formatter = formatter_with(product("GBP"), Some(twenty_percent_off()), Arc::new(DefaultAmountRenderer::default()));
        for value in [
            PricingValue::fixed(dec!(12.34)),
            PricingValue::fixed(dec!(-7)),
            PricingValue::percent(dec!(5)),
            PricingValue::fixed(Decimal::ZERO),
        ] {
            for badge in [true, false] {
                assert_eq!(formatter.format_price_legacy(value, badge), formatter.format_price(value, badge));
            }
        }
    }

    #[test]
    fn formatted_price_is_empty_without_option() {
        let formatter = formatter_with(product("GBP"), None, Arc::new(DefaultAmountRenderer::default()));
        assert_eq!(formatter.formatted_price(), "");
    }

    #[test]
    #[allow(deprecated)]
    fn formatted_price_uses_bound_option() {
        let product = product("GBP");
        let option = CustomOption::new(OptionId::new(), Arc::clone(&product), "Engraving", dec!(50), PriceType::Fixed).unwrap();
        let formatter = formatter_with(product, Some(twenty_percent_off()), Arc::new(DefaultAmountRenderer::default()))
            .with_option(option);

        let expected = "<span class=\"price-notice\">+<span class=\"price\">£40.00</span></span>";
        assert_eq!(formatter.formatted_price(), expected);
        assert_eq!(formatter.formated_price(), expected);
    }

    #[test]
    fn formatted_percent_option_keeps_stored_percentage() {
        let product = product("GBP");
        let option = CustomOption::new(OptionId::new(), Arc::clone(&product), "Headboard", dec!(10), PriceType::Percent).unwrap();
        let renderer = Arc::new(RecordingRenderer::default());
        let formatter = formatter_with(product, Some(twenty_percent_off()), renderer).with_option(option);

        assert_eq!(formatter.formatted_price(), "<span class=\"price-notice\">+10.00</span>");
    }

    #[test]
    fn tax_price_requests_inclusive_figure_for_any_explicit_choice() {
        let formatter = formatter_with(product("GBP"), None, Arc::new(DefaultAmountRenderer::default()));
        assert_eq!(formatter.price(dec!(10), None), dec!(10));
        assert_eq!(formatter.price(dec!(10), Some(true)), dec!(12.0));
        assert_eq!(formatter.price(dec!(10), Some(false)), dec!(12.0));
    }

    #[test]
    fn currency_price_uses_product_store() {
        let eu_product = Arc::new(
            Product::new(ProductId::new(), "BED-002", "Pine Bed", dec!(90), "EUR")
                .unwrap()
                .with_store("eu"),
        );
        let formatter = formatter_with(product("GBP"), None, Arc::new(DefaultAmountRenderer::default()));
        assert_eq!(formatter.currency_price(dec!(100)), dec!(100));

        let formatter = formatter.with_product(eu_product);
        assert_eq!(formatter.currency_price(dec!(100)), dec!(115.00));
    }

    #[test]
    fn default_renderer_falls_back_to_currency_code() {
        let renderer = DefaultAmountRenderer::default();
        let product = product("CHF");
        assert_eq!(
            renderer.render_amount(dec!(1000000), &product, &AmountContext::default()),
            "<span class=\"price\">CHF 1,000,000.00</span>"
        );
    }

    #[test]
    fn default_renderer_rounds_like_the_calculator() {
        let renderer = DefaultAmountRenderer::default();
        let product = product("GBP");
        let ctx = AmountContext::default();

        assert_eq!(PricingConfig::default().round(dec!(0.125)), dec!(0.13));
        assert_eq!(renderer.render_amount(dec!(0.125), &product, &ctx), "<span class=\"price\">£0.13</span>");
        assert_eq!(renderer.render_amount(dec!(-2.675), &product, &ctx), "<span class=\"price\">-£2.68</span>");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the deprecated alias is byte-identical for any input.
            #[test]
            #[allow(deprecated)]
            fn legacy_alias_is_identical(cents in -1_000_000i64..1_000_000, percent in any::<bool>(), badge in any::<bool>()) {
                let formatter = formatter_with(product("GBP"), Some(twenty_percent_off()), Arc::new(DefaultAmountRenderer::default()));
                let value = PricingValue { is_percent: percent, pricing_value: Decimal::new(cents, 2) };
                prop_assert_eq!(formatter.format_price_legacy(value, badge), formatter.format_price(value, badge));
            }

            /// Property: non-zero amounts always carry a sign matching the input.
            #[test]
            fn sign_matches_input(cents in 1i64..1_000_000, negative in any::<bool>()) {
                let formatter = formatter_with(product("GBP"), None, Arc::new(DefaultAmountRenderer::default()));
                let amount = Decimal::new(if negative { -cents } else { cents }, 2);
                let rendered = formatter.format_price(PricingValue::fixed(amount), false);
                let expected_sign = if negative { '-' } else { '+' };
                prop_assert!(rendered.starts_with(expected_sign));
            }
        }
    }
}
