//! Optimistic concurrency expectations for catalog writes.

use crate::error::{DomainError, DomainResult};

/// Optimistic concurrency expectation for a catalog.
///
/// A resolver decision is taken against a snapshot at some version; applying it
/// with `Exact(version)` makes the write fail with `Conflict` if anything else
/// touched the catalog in between.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (stock adjustments, migrations, etc.).
    Any,
    /// Require the catalog to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
