//! Interception of the host's option price accessors.
//!
//! The host exposes `price(flag)` on both custom options and option values.
//! [`PriceInterceptor::around_get_price`] wraps either one: a set flag routes
//! the lookup through the calculator, a cleared flag calls the original
//! accessor untouched.

use rust_decimal::Decimal;

use optrules_catalog::{CustomOption, OptionValue, PriceType, Product};

use crate::calculator::CustomOptionPriceCalculator;

/// Read access an interception site needs from a priced entity.
pub trait PricedEntity {
    /// Diagnostic name of the interception site for this entity kind.
    const SITE: &'static str;

    fn product(&self) -> &Product;

    /// Stored amount, before any resolution against the product price.
    fn raw_price(&self) -> Decimal;

    fn price_type(&self) -> PriceType;

    /// The host's own accessor, used as the pass-through implementation.
    fn host_price(&self, flag: bool) -> Decimal;
}

impl PricedEntity for CustomOption {
    const SITE: &'static str = "ProductOptionPlugin";

    fn product(&self) -> &Product {
        CustomOption::product(self)
    }

    fn raw_price(&self) -> Decimal {
        CustomOption::raw_price(self)
    }

    fn price_type(&self) -> PriceType {
        CustomOption::price_type(self)
    }

    fn host_price(&self, flag: bool) -> Decimal {
        self.price(flag)
    }
}

impl PricedEntity for OptionValue {
    const SITE: &'static str = "ProductOptionValuePlugin";

    fn product(&self) -> &Product {
        OptionValue::product(self)
    }

    fn raw_price(&self) -> Decimal {
        OptionValue::raw_price(self)
    }

    fn price_type(&self) -> PriceType {
        OptionValue::price_type(self)
    }

    fn host_price(&self, flag: bool) -> Decimal {
        self.price(flag)
    }
}

/// Around-advice for price accessors of any [`PricedEntity`].
#[derive(Debug, Clone)]
pub struct PriceInterceptor<C> {
    calculator: C,
}

impl<C: CustomOptionPriceCalculator> PriceInterceptor<C> {
    pub fn new(calculator: C) -> Self {
        Self { calculator }
    }

    /// Wrap one accessor call.
    ///
    /// `proceed` is the original implementation; it is not invoked at all when
    /// `flag` is set.
    pub fn around_get_price<E, F>(&self, entity: &E, proceed: F, flag: bool) -> Decimal
    where
        E: PricedEntity,
        F: FnOnce(bool) -> Decimal,
    {
        if flag {
            return self.calculator.calculate(
                entity.product(),
                entity.raw_price(),
                entity.price_type() == PriceType::Percent,
                E::SITE,
            );
        }
        proceed(flag)
    }

    /// Intercepted read of the entity's own host accessor.
    pub fn price<E: PricedEntity>(&self, entity: &E, flag: bool) -> Decimal {
        self.around_get_price(entity, |f| entity.host_price(f), flag)
    }
}
