use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockmerge_core::{CatalogId, DomainError, DomainResult, ExpectedVersion, RecordId};
use stockmerge_inventory::{CatalogRecord, PendingRecord, ResolutionDecision, StockDirection, adjust};
use stockmerge_matching::Named;

use super::r#trait::{CatalogSnapshot, CatalogStore};

#[derive(Debug, Default)]
struct CatalogState {
    version: u64,
    last_id: u64,
    records: BTreeMap<RecordId, CatalogRecord>,
}

impl CatalogState {
    fn insert(&mut self, fields: PendingRecord) -> DomainResult<CatalogRecord> {
        let id = RecordId::new(self.last_id).next()?;
        let record = CatalogRecord::new(id, fields)?;
        self.last_id = id.get();
        self.records.insert(id, record.clone());
        Ok(record)
    }
}

/// In-memory catalog store.
///
/// Intended for tests/dev and the CLI. A single `RwLock` serializes writers,
/// which is what makes snapshot → resolve → apply safe with version checks.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    catalogs: RwLock<HashMap<CatalogId, CatalogState>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load existing records without deduplication.
    ///
    /// Existing data may already contain near-duplicates; that is what
    /// grouping is for. Bumps the catalog version once.
    pub fn import(
        &self,
        catalog_id: CatalogId,
        records: impl IntoIterator<Item = PendingRecord>,
    ) -> DomainResult<Vec<CatalogRecord>> {
        let records: Vec<PendingRecord> = records.into_iter().collect();
        for fields in &records {
            fields.validate()?;
        }

        let mut catalogs = self.write()?;
        let state = catalogs.entry(catalog_id).or_default();

        let imported = records
            .into_iter()
            .map(|fields| state.insert(fields))
            .collect::<DomainResult<Vec<_>>>()?;

        state.version += 1;
        tracing::info!(%catalog_id, count = imported.len(), "imported catalog records");
        Ok(imported)
    }

    /// Load records that already carry ids (e.g. from a JSON export).
    pub fn restore(&self, catalog_id: CatalogId, records: Vec<CatalogRecord>) -> DomainResult<()> {
        let mut catalogs = self.write()?;
        let state = catalogs.entry(catalog_id).or_default();

        let mut seen = HashSet::new();
        for record in &records {
            let id = record.record_id();
            if state.records.contains_key(&id) || !seen.insert(id) {
                return Err(DomainError::conflict(format!("duplicate record id {id}")));
            }
        }

        for record in records {
            let id = record.record_id();
            state.last_id = state.last_id.max(id.get());
            state.records.insert(id, record);
        }

        state.version += 1;
        Ok(())
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, HashMap<CatalogId, CatalogState>>> {
        self.catalogs
            .read()
            .map_err(|_| DomainError::invariant("catalog store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, HashMap<CatalogId, CatalogState>>> {
        self.catalogs
            .write()
            .map_err(|_| DomainError::invariant("catalog store lock poisoned"))
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn snapshot(&self, catalog_id: CatalogId) -> DomainResult<CatalogSnapshot> {
        let catalogs = self.read()?;
        let snapshot = match catalogs.get(&catalog_id) {
            Some(state) => CatalogSnapshot {
                catalog_id,
                version: state.version,
                records: state.records.values().cloned().collect(),
            },
            None => CatalogSnapshot {
                catalog_id,
                version: 0,
                records: Vec::new(),
            },
        };
        Ok(snapshot)
    }

    fn get(&self, catalog_id: CatalogId, record_id: RecordId) -> DomainResult<CatalogRecord> {
        let catalogs = self.read()?;
        catalogs
            .get(&catalog_id)
            .and_then(|state| state.records.get(&record_id))
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("record {record_id} in catalog {catalog_id}")))
    }

    fn apply(
        &self,
        catalog_id: CatalogId,
        decision: &ResolutionDecision,
        expected: ExpectedVersion,
    ) -> DomainResult<CatalogRecord> {
        let mut catalogs = self.write()?;
        let state = catalogs.entry(catalog_id).or_default();
        expected.check(state.version)?;

        let record = match decision {
            ResolutionDecision::Merge {
                target_id,
                new_quantity,
            } => {
                let target = state.records.get_mut(target_id).ok_or_else(|| {
                    DomainError::not_found(format!("record {target_id} in catalog {catalog_id}"))
                })?;
                if !target.is_active() {
                    return Err(DomainError::conflict(format!(
                        "merge target {target_id} is no longer active"
                    )));
                }
                target.set_quantity_available(*new_quantity)?;
                target.clone()
            }
            ResolutionDecision::Create { record } => {
                let canonical = record.canonical_name();
                let taken = state
                    .records
                    .values()
                    .any(|r| r.is_active() && r.canonical_name() == canonical);
                if taken {
                    return Err(DomainError::conflict(format!(
                        "an active record named '{canonical}' already exists"
                    )));
                }
                state.insert(record.clone())?
            }
        };

        state.version += 1;
        tracing::debug!(
            %catalog_id,
            record_id = %record.record_id(),
            version = state.version,
            "applied resolution decision"
        );
        Ok(record)
    }

    fn adjust(
        &self,
        catalog_id: CatalogId,
        record_id: RecordId,
        delta: f64,
        direction: StockDirection,
    ) -> DomainResult<CatalogRecord> {
        let mut catalogs = self.write()?;
        let state = catalogs
            .get_mut(&catalog_id)
            .ok_or_else(|| DomainError::not_found(format!("catalog {catalog_id}")))?;
        let record = state
            .records
            .get_mut(&record_id)
            .ok_or_else(|| DomainError::not_found(format!("record {record_id} in catalog {catalog_id}")))?;

        adjust(record, delta, direction)?;
        let updated = record.clone();
        state.version += 1;
        Ok(updated)
    }
}
