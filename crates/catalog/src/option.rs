use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use optrules_core::{DomainError, DomainResult, Entity, OptionId, OptionValueId, ValueObject};

use crate::product::Product;

/// How an option's price amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Absolute amount added to the product price.
    Fixed,
    /// Percentage of the product's base price.
    Percent,
}

impl PriceType {
    pub fn is_percent(self) -> bool {
        matches!(self, PriceType::Percent)
    }
}

impl ValueObject for PriceType {}

/// Percent-type amounts resolve against the product's regular price.
fn resolve_price(product: &Product, raw: Decimal, price_type: PriceType, flag: bool) -> Decimal {
    if flag && price_type.is_percent() {
        return product.regular_price() * raw / Decimal::ONE_HUNDRED;
    }
    raw
}

fn ensure_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title cannot be empty"));
    }
    Ok(())
}

/// A priced custom option attached to a product (e.g. engraving).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomOption {
    id: OptionId,
    product: Arc<Product>,
    title: String,
    price: Decimal,
    price_type: PriceType,
    values: Vec<OptionValue>,
}

impl CustomOption {
    pub fn new(
        id: OptionId,
        product: Arc<Product>,
        title: impl Into<String>,
        price: Decimal,
        price_type: PriceType,
    ) -> DomainResult<Self> {
        let title = title.into();
        ensure_title(&title)?;

        Ok(Self {
            id,
            product,
            title,
            price,
            price_type,
            values: Vec::new(),
        })
    }

    /// Attach a selectable value. The value must belong to this option.
    pub fn with_value(mut self, value: OptionValue) -> DomainResult<Self> {
        if value.option_id() != self.id {
            return Err(DomainError::invariant("option value belongs to another option"));
        }
        if value.product() != self.product() {
            return Err(DomainError::invariant("option value belongs to another product"));
        }
        self.values.push(value);
        Ok(self)
    }

    pub fn id_typed(&self) -> OptionId {
        self.id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The stored amount, never resolved against the product price.
    pub fn raw_price(&self) -> Decimal {
        self.price
    }

    pub fn price_type(&self) -> PriceType {
        self.price_type
    }

    pub fn values(&self) -> &[OptionValue] {
        &self.values
    }

    /// Host price accessor.
    ///
    /// With `flag` set, percent amounts are resolved against the product's
    /// regular price; otherwise the stored amount is returned as-is.
    pub fn price(&self, flag: bool) -> Decimal {
        resolve_price(&self.product, self.price, self.price_type, flag)
    }
}

impl Entity for CustomOption {
    type Id = OptionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One selectable value of a custom option (e.g. "Gold engraving").
#[derive(Debug, Clone, PartialEq)]
pub struct OptionValue {
    id: OptionValueId,
    option_id: OptionId,
    product: Arc<Product>,
    title: String,
    price: Decimal,
    price_type: PriceType,
}

impl OptionValue {
    pub fn new(
        id: OptionValueId,
        option_id: OptionId,
        product: Arc<Product>,
        title: impl Into<String>,
        price: Decimal,
        price_type: PriceType,
    ) -> DomainResult<Self> {
        let title = title.into();
        ensure_title(&title)?;

        Ok(Self {
            id,
            option_id,
            product,
            title,
            price,
            price_type,
        })
    }

    pub fn id_typed(&self) -> OptionValueId {
        self.id
    }

    pub fn option_id(&self) -> OptionId {
        self.option_id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn raw_price(&self) -> Decimal {
        self.price
    }

    pub fn price_type(&self) -> PriceType {
        self.price_type
    }

    /// Host price accessor; same resolution rules as [`CustomOption::price`].
    pub fn price(&self, flag: bool) -> Decimal {
        resolve_price(&self.product, self.price, self.price_type, flag)
    }
}

impl Entity for OptionValue {
    type Id = OptionValueId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
