//! Catalog entities as seen by the pricing layer.
//!
//! The host platform owns these entities; this crate only gives them a typed,
//! read-only shape (no IO, no storage, no mutation after construction).

pub mod option;
pub mod product;

pub use option::{CustomOption, OptionValue, PriceType};
pub use product::Product;
