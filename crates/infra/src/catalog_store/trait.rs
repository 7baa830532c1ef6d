use std::sync::Arc;

use serde::Serialize;

use stockmerge_core::{CatalogId, DomainResult, ExpectedVersion, RecordId};
use stockmerge_inventory::{CatalogRecord, ResolutionDecision, StockDirection};

/// Point-in-time view of one catalog.
///
/// `version` increases with every successful write, so a decision taken on
/// this snapshot can be applied with `ExpectedVersion::Exact(version)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub catalog_id: CatalogId,
    pub version: u64,
    /// All records, active or not, ordered by id.
    pub records: Vec<CatalogRecord>,
}

impl CatalogSnapshot {
    pub fn active(&self) -> Vec<CatalogRecord> {
        self.records.iter().filter(|r| r.is_active()).cloned().collect()
    }
}

/// Persistence boundary for catalogs.
///
/// Implementations apply writes atomically per catalog and report races as
/// `Conflict` and missing ids as `NotFound`; they never retry on their own.
pub trait CatalogStore: Send + Sync {
    /// Current records and version. An unknown catalog is empty at version 0.
    fn snapshot(&self, catalog_id: CatalogId) -> DomainResult<CatalogSnapshot>;

    fn get(&self, catalog_id: CatalogId, record_id: RecordId) -> DomainResult<CatalogRecord>;

    /// Apply a resolver decision, returning the merged or created record.
    ///
    /// - stale `expected` version → `Conflict`
    /// - `Merge` into a missing id → `NotFound`, into an inactive one → `Conflict`
    /// - `Create` whose canonical name is already active → `Conflict`
    fn apply(
        &self,
        catalog_id: CatalogId,
        decision: &ResolutionDecision,
        expected: ExpectedVersion,
    ) -> DomainResult<CatalogRecord>;

    /// Move stock in or out of one record; on failure nothing changes.
    fn adjust(
        &self,
        catalog_id: CatalogId,
        record_id: RecordId,
        delta: f64,
        direction: StockDirection,
    ) -> DomainResult<CatalogRecord>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn snapshot(&self, catalog_id: CatalogId) -> DomainResult<CatalogSnapshot> {
        (**self).snapshot(catalog_id)
    }

    fn get(&self, catalog_id: CatalogId, record_id: RecordId) -> DomainResult<CatalogRecord> {
        (**self).get(catalog_id, record_id)
    }

    fn apply(
        &self,
        catalog_id: CatalogId,
        decision: &ResolutionDecision,
        expected: ExpectedVersion,
    ) -> DomainResult<CatalogRecord> {
        (**self).apply(catalog_id, decision, expected)
    }

    fn adjust(
        &self,
        catalog_id: CatalogId,
        record_id: RecordId,
        delta: f64,
        direction: StockDirection,
    ) -> DomainResult<CatalogRecord> {
        (**self).adjust(catalog_id, record_id, delta, direction)
    }
}
