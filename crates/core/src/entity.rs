//! Entity trait: identity that survives across requests.

/// Entity marker + minimal interface.
///
/// Catalog entities are owned by the host platform; implementing this lets
/// pricing code refer to them by id in logs without knowing their shape.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
