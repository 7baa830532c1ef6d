//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// A catalog record keeps its identity while its stock moves up and down; two
/// records with the same name but different ids are still different entities.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
