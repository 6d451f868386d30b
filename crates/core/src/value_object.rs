//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity** - they are defined entirely by their
//! attribute values. Two value objects with the same values are equal.

/// Marker trait for value objects.
///
/// Implementors should be `Clone + PartialEq` and validate their invariants
/// at construction time, so an instance is valid for its whole lifetime.
pub trait ValueObject: Clone + PartialEq {}
