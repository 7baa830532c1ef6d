//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts, stock guards). None of these are recovered inside the
/// matching/resolution core; they propagate to the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. threshold out of range, blank name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced catalog record does not exist in the current snapshot.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write raced with another writer (stale snapshot, duplicate canonical name).
    ///
    /// Recovery is to re-fetch the catalog and resolve again.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stock withdrawal exceeds the quantity available.
    #[error("insufficient stock (available: {available}, requested: {requested})")]
    InsufficientStock { available: f64, requested: f64 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_stock(available: f64, requested: f64) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    /// Whether the caller should re-fetch its snapshot and retry.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
