//! Entity trait: identity + lookup by id.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Find the entity with the given id in a slice.
///
/// A miss is not an error: callers resolve it to an absent field.
pub fn find_by_id<E: Entity>(entities: &[E], id: E::Id) -> Option<&E> {
    entities.iter().find(|e| e.id() == id)
}
