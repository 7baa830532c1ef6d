//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are domain objects that are **immutable** and **compared by value**.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two thresholds of `0.9` are the same threshold)
/// - **Entity**: Has identity (two catalog records with the same id are the same record)
///
/// Example:
/// - `Threshold(0.9)` is a value object
/// - `CanonicalName("acido hialuronico")` is a value object
/// - `CatalogRecord { id: RecordId(1), raw_name: "...", .. }` is an entity
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Unit(String);
///
/// impl ValueObject for Unit {}
///
/// assert_eq!(Unit("ml".into()), Unit("ml".into()));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
