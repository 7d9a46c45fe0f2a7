//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Implemented by option price types and catalog rule actions: two equal
/// values are interchangeable, and neither is mutated in place.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
