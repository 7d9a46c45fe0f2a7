//! `optrules-core`: shared building blocks for the option pricing crates.
//!
//! This crate contains **pure domain** primitives (no host-platform concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{OptionId, OptionValueId, ProductId, RuleId};
pub use value_object::ValueObject;
