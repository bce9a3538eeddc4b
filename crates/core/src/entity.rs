//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Identifiers are integer-backed so a persistence collaborator can allocate
/// them from a counter.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + From<u64>;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
