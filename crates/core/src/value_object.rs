//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their attribute values.
//! Contact details and postal addresses are value objects: replacing one means building a new
//! value, never mutating a shared one.

/// Marker trait for value objects.
///
/// The trait requires:
/// - **Clone**: value objects are copied, not shared
/// - **PartialEq**: compared by attribute values
/// - **Debug**: printable in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {
    /// Whether every attribute of the value is unset.
    fn is_empty(&self) -> bool;
}
