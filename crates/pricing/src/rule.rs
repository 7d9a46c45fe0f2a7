//! Catalog price rules as handed over by the host's rule index.
//!
//! Rules arrive already filtered for the request (website, customer group,
//! active dates); this module only knows how to apply them to an amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use optrules_core::{DomainError, DomainResult, RuleId, ValueObject};

/// How a rule's discount amount transforms a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Reduce by a percentage of the price.
    ByPercent,
    /// Reduce by a fixed amount (never below zero).
    ByFixed,
    /// Set to a percentage of the price.
    ToPercent,
    /// Set to a fixed amount (never above the price).
    ToFixed,
}

impl RuleAction {
    pub fn is_percent(self) -> bool {
        matches!(self, RuleAction::ByPercent | RuleAction::ToPercent)
    }

    /// `None` when the result does not fit in a `Decimal`.
    pub fn apply(self, price: Decimal, discount: Decimal) -> Option<Decimal> {
        match self {
            RuleAction::ByPercent => price
                .checked_mul(Decimal::ONE_HUNDRED.checked_sub(discount)?)?
                .checked_div(Decimal::ONE_HUNDRED),
            RuleAction::ByFixed => Some(price.checked_sub(discount)?.max(Decimal::ZERO)),
            RuleAction::ToPercent => price.checked_mul(discount)?.checked_div(Decimal::ONE_HUNDRED),
            RuleAction::ToFixed => Some(discount.min(price)),
        }
    }
}

impl ValueObject for RuleAction {}

/// A single catalog price rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRule {
    pub id: RuleId,
    pub name: String,
    pub action: RuleAction,
    pub discount_amount: Decimal,
    /// Lower runs first.
    pub sort_order: u32,
    /// Skip every rule ordered after this one.
    pub stop_further_processing: bool,
}

impl CatalogRule {
    pub fn new(
        id: RuleId,
        name: impl Into<String>,
        action: RuleAction,
        discount_amount: Decimal,
    ) -> DomainResult<Self> {
        let rule = Self {
            id,
            name: name.into(),
            action,
            discount_amount,
            sort_order: 0,
            stop_further_processing: false,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn stopping_further_processing(mut self) -> Self {
        self.stop_further_processing = true;
        self
    }

    /// Rules may be deserialized straight from the host, so validation is
    /// also reachable outside the constructor.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("rule name cannot be empty"));
        }

        if self.discount_amount < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "rule {}: discount amount cannot be negative",
                self.id
            )));
        }

        if self.action.is_percent() && self.discount_amount > Decimal::ONE_HUNDRED {
            return Err(DomainError::validation(format!(
                "rule {}: percentage discount cannot exceed 100",
                self.id
            )));
        }

        Ok(())
    }

    pub fn apply(&self, price: Decimal) -> Option<Decimal> {
        self.action.apply(price, self.discount_amount)
    }
}

/// The rules applicable to one product for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleContext {
    rules: Vec<CatalogRule>,
}

impl RuleContext {
    /// Validate and order the rules (stable on equal `sort_order`).
    pub fn new(mut rules: Vec<CatalogRule>) -> DomainResult<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        rules.sort_by_key(|r| r.sort_order);
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CatalogRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run `price` through every rule in order, honoring stop flags.
    ///
    /// `None` if any step overflows.
    pub fn apply(&self, price: Decimal) -> Option<Decimal> {
        let mut current = price;
        for rule in &self.rules {
            current = rule.apply(current)?;
            if rule.stop_further_processing {
                break;
            }
        }
        Some(current)
    }
}
