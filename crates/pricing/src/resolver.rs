//! Rule resolution seam (host platform → pricing).

use std::collections::HashMap;
use std::sync::Arc;

use optrules_catalog::Product;
use optrules_core::ProductId;

use crate::error::PricingResult;
use crate::rule::{CatalogRule, RuleContext};

/// Looks up the catalog rules applicable to a product for the current request.
///
/// `Ok(None)` means the product has no rule context at all. Errors are treated
/// the same way by the calculator (fail-open), but are logged.
pub trait RuleResolver: Send + Sync {
    fn resolve(&self, product: &Product) -> PricingResult<Option<RuleContext>>;
}

impl<T> RuleResolver for Arc<T>
where
    T: RuleResolver + ?Sized,
{
    fn resolve(&self, product: &Product) -> PricingResult<Option<RuleContext>> {
        (**self).resolve(product)
    }
}

impl<T> RuleResolver for &T
where
    T: RuleResolver + ?Sized,
{
    fn resolve(&self, product: &Product) -> PricingResult<Option<RuleContext>> {
        (**self).resolve(product)
    }
}

/// Resolver backed by a pre-built map of product → rule context.
///
/// Useful when the host has already loaded the rule index for a request, and
/// in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuleResolver {
    contexts: HashMap<ProductId, RuleContext>,
}

impl InMemoryRuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, product_id: ProductId, context: RuleContext) -> Self {
        self.insert(product_id, context);
        self
    }

    pub fn insert(&mut self, product_id: ProductId, context: RuleContext) {
        self.contexts.insert(product_id, context);
    }

    /// Validate raw rules from the host index and register them for a product.
    pub fn insert_rules(&mut self, product_id: ProductId, rules: Vec<CatalogRule>) -> PricingResult<()> {
        let context = RuleContext::new(rules)?;
        self.insert(product_id, context);
        Ok(())
    }
}

impl RuleResolver for InMemoryRuleResolver {
    fn resolve(&self, product: &Product) -> PricingResult<Option<RuleContext>> {
        Ok(self.contexts.get(&product.id_typed()).cloned())
    }
}
