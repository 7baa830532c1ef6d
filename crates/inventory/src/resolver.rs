//! Merge-or-create decision for incoming inventory entries.
//!
//! `resolve` is a pure function of an entry and a catalog snapshot. It never
//! writes: the caller applies the decision, and must serialize application per
//! catalog (single writer, or an optimistic version/uniqueness check with
//! re-fetch and retry on conflict). Two resolutions against the same stale
//! snapshot can otherwise both decide `Create` for the same item.

use serde::{Deserialize, Serialize};

use stockmerge_core::{DomainResult, RecordId, Threshold};
use stockmerge_matching::{Stocked, rank};

use crate::record::{CatalogRecord, NewEntry, PendingRecord};

/// Outcome of resolving a new entry against a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ResolutionDecision {
    /// Fold the entry into an existing record; only its quantity changes.
    Merge {
        target_id: RecordId,
        new_quantity: f64,
    },
    /// Insert a new, active record.
    Create { record: PendingRecord },
}

impl ResolutionDecision {
    pub fn is_merge(&self) -> bool {
        matches!(self, Self::Merge { .. })
    }
}

/// Decide whether `new_entry` duplicates a record in `catalog`.
///
/// Only active records are merge targets. The best match by score wins, with
/// the lowest id breaking ties; with no record at or above `merge_threshold`
/// the entry becomes a new record.
pub fn resolve(
    new_entry: &NewEntry,
    catalog: &[CatalogRecord],
    merge_threshold: f64,
) -> DomainResult<ResolutionDecision> {
    let threshold = Threshold::new(merge_threshold)?;
    new_entry.validate()?;

    let active: Vec<&CatalogRecord> = catalog.iter().filter(|r| r.is_active()).collect();
    let matches = rank(&new_entry.raw_name, &active, threshold);

    let best = matches.first().and_then(|top| {
        matches
            .iter()
            .take_while(|m| m.score == top.score)
            .min_by_key(|m| m.record.record_id())
    });

    let decision = match best {
        Some(best) => {
            let target = *best.record;
            ResolutionDecision::Merge {
                target_id: target.record_id(),
                new_quantity: target.quantity_available() + new_entry.quantity,
            }
        }
        None => ResolutionDecision::Create {
            record: new_entry.to_pending_record(),
        },
    };

    tracing::debug!(
        name = %new_entry.raw_name,
        candidates = active.len(),
        matched = matches.len(),
        threshold = threshold.value(),
        merge = decision.is_merge(),
        "resolved entry"
    );

    Ok(decision)
}
