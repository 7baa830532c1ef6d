//! What the matcher and grouper need to know about a catalog entry.

use crate::normalize::CanonicalName;

/// Anything identified by a human-entered name.
pub trait Named {
    /// Display name as entered.
    fn raw_name(&self) -> &str;

    /// Comparison form, recomputed from [`Named::raw_name`] on every call.
    fn canonical_name(&self) -> CanonicalName {
        CanonicalName::from_raw(self.raw_name())
    }
}

/// A named entry with an on-hand quantity (needed for cluster aggregation).
pub trait Stocked: Named {
    fn quantity_available(&self) -> f64;
}

impl Named for str {
    fn raw_name(&self) -> &str {
        self
    }
}

impl Named for String {
    fn raw_name(&self) -> &str {
        self
    }
}

impl<T: Named + ?Sized> Named for &T {
    fn raw_name(&self) -> &str {
        (**self).raw_name()
    }
}

impl<T: Stocked + ?Sized> Stocked for &T {
    fn quantity_available(&self) -> f64 {
        (**self).quantity_available()
    }
}
