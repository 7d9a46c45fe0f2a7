use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use optrules_core::{DomainError, DomainResult, Entity, ProductId};

/// Store code used when the host does not scope a product to a store view.
pub const DEFAULT_STORE: &str = "default";

/// Catalog product (read-only snapshot handed over by the host).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    /// Regular price before any catalog rule, in major currency units.
    regular_price: Decimal,
    /// ISO currency code (e.g. "USD", "EUR").
    currency_code: String,
    store_code: String,
}

impl Product {
    /// Build a product snapshot, validating the fields pricing depends on.
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        regular_price: Decimal,
        currency_code: impl Into<String>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();
        let currency_code = currency_code.into();

        if sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }

        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        if regular_price < Decimal::ZERO {
            return Err(DomainError::validation("regular price cannot be negative"));
        }

        if currency_code.len() != 3 || !currency_code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::validation(format!(
                "currency code must be three uppercase letters, got {currency_code:?}"
            )));
        }

        Ok(Self {
            id,
            sku,
            name,
            regular_price,
            currency_code,
            store_code: DEFAULT_STORE.to_string(),
        })
    }

    /// Scope the snapshot to a store view.
    pub fn with_store(mut self, store_code: impl Into<String>) -> Self {
        self.store_code = store_code.into();
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regular_price(&self) -> Decimal {
        self.regular_price
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn store_code(&self) -> &str {
        &self.store_code
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
