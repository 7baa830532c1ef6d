//! Catalog operations over a store (application-level orchestration).
//!
//! This is the entry point inventory endpoints call: search and grouping read
//! a snapshot, stock movements go straight to the store, and ingest runs the
//! merge-or-create pipeline:
//!
//! ```text
//! NewEntry
//!   ↓
//! 1. Snapshot the catalog (records + version)
//!   ↓
//! 2. Resolve against the snapshot (pure decision: Merge or Create)
//!   ↓
//! 3. Apply with ExpectedVersion::Exact(snapshot.version)
//!   ↓
//! 4. On Conflict: back to 1, up to `max_resolve_attempts`
//! ```
//!
//! Two concurrent ingests of the same item therefore end as one create plus
//! one merge instead of two creates.

use serde::Serialize;

use stockmerge_core::{CatalogId, DomainResult, ExpectedVersion, MatchingConfig, RecordId, Threshold};
use stockmerge_inventory::{CatalogRecord, NewEntry, StockDirection, low_stock, resolve};
use stockmerge_matching::{Cluster, group_with_mode, rank};

use crate::catalog_store::CatalogStore;

/// Search hit with an owned copy of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: CatalogRecord,
    pub score: f64,
}

/// Result of an ingest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestOutcome {
    /// The merged-into or newly created record, as stored.
    pub record: CatalogRecord,
    pub merged: bool,
    /// Snapshot/resolve/apply rounds taken (1 without contention).
    pub attempts: u32,
}

#[derive(Debug)]
pub struct CatalogService<S> {
    store: S,
    config: MatchingConfig,
}

impl<S> CatalogService<S>
where
    S: CatalogStore,
{
    pub fn new(store: S, config: MatchingConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Active records similar to `query`, best first.
    ///
    /// `threshold` defaults to the configured search threshold.
    pub fn search(
        &self,
        catalog_id: CatalogId,
        query: &str,
        threshold: Option<f64>,
    ) -> DomainResult<Vec<ScoredRecord>> {
        let threshold = match threshold {
            Some(value) => Threshold::new(value)?,
            None => self.config.search_threshold,
        };
        let active = self.store.snapshot(catalog_id)?.active();

        Ok(rank(query, &active, threshold)
            .into_iter()
            .map(|m| ScoredRecord {
                record: m.record.clone(),
                score: m.score,
            })
            .collect())
    }

    /// Clusters of near-duplicate active records, using the configured
    /// threshold and linkage unless overridden.
    pub fn group(
        &self,
        catalog_id: CatalogId,
        threshold: Option<f64>,
    ) -> DomainResult<Vec<Cluster<CatalogRecord>>> {
        let threshold = threshold.unwrap_or(self.config.group_threshold.value());
        let active = self.store.snapshot(catalog_id)?.active();
        group_with_mode(&active, threshold, self.config.grouping_mode)
    }

    pub fn low_stock(&self, catalog_id: CatalogId) -> DomainResult<Vec<CatalogRecord>> {
        let snapshot = self.store.snapshot(catalog_id)?;
        Ok(low_stock(&snapshot.records).into_iter().cloned().collect())
    }

    pub fn adjust(
        &self,
        catalog_id: CatalogId,
        record_id: RecordId,
        delta: f64,
        direction: StockDirection,
    ) -> DomainResult<CatalogRecord> {
        match self.store.adjust(catalog_id, record_id, delta, direction) {
            Ok(record) => {
                tracing::info!(%catalog_id, %record_id, ?direction, delta, "stock adjusted");
                Ok(record)
            }
            Err(err) => {
                tracing::warn!(%catalog_id, %record_id, ?direction, delta, error = %err, "stock adjustment rejected");
                Err(err)
            }
        }
    }

    /// Merge `entry` into a near-duplicate or create it, retrying on races.
    ///
    /// After `max_resolve_attempts` conflicting rounds the last `Conflict` is
    /// returned to the caller.
    pub fn ingest(&self, catalog_id: CatalogId, entry: &NewEntry) -> DomainResult<IngestOutcome> {
        let max_attempts = self.config.max_resolve_attempts;
        let mut attempts = 0;

        loop {
            attempts += 1;

            let snapshot = self.store.snapshot(catalog_id)?;
            let decision = resolve(entry, &snapshot.records, self.config.merge_threshold.value())?;

            match self
                .store
                .apply(catalog_id, &decision, ExpectedVersion::Exact(snapshot.version))
            {
                Ok(record) => {
                    let merged = decision.is_merge();
                    tracing::info!(
                        %catalog_id,
                        record_id = %record.record_id(),
                        name = %entry.raw_name,
                        merged,
                        attempts,
                        "ingested entry"
                    );
                    return Ok(IngestOutcome {
                        record,
                        merged,
                        attempts,
                    });
                }
                Err(err) if err.is_conflict() && attempts < max_attempts => {
                    tracing::warn!(
                        %catalog_id,
                        name = %entry.raw_name,
                        attempts,
                        error = %err,
                        "ingest raced with another writer; retrying on a fresh snapshot"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}
