//! Rank catalog candidates against a query name.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use stockmerge_core::{DomainResult, Threshold};

use crate::candidate::Named;
use crate::normalize::CanonicalName;
use crate::similarity::score;

/// One candidate that cleared the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a, T> {
    pub record: &'a T,
    /// Position of `record` in the candidate slice.
    pub index: usize,
    pub score: f64,
}

/// Find candidates whose names score at least `threshold` against `query`.
///
/// Results are sorted by descending score; equal scores keep candidate order,
/// so repeated calls on the same input return the same sequence. A blank
/// query matches nothing. A threshold outside `[0, 1]` is a `Validation`
/// error.
pub fn find_matches<'a, T>(
    query: &str,
    candidates: &'a [T],
    threshold: f64,
) -> DomainResult<Vec<MatchResult<'a, T>>>
where
    T: Named + Sync,
{
    let threshold = Threshold::new(threshold)?;
    Ok(rank(query, candidates, threshold))
}

/// [`find_matches`] with an already-validated threshold.
pub fn rank<'a, T>(query: &str, candidates: &'a [T], threshold: Threshold) -> Vec<MatchResult<'a, T>>
where
    T: Named + Sync,
{
    let query = CanonicalName::from_raw(query);
    if query.is_empty() {
        return Vec::new();
    }

    let scores = score_all(&query, candidates);

    let mut matches: Vec<MatchResult<'a, T>> = candidates
        .iter()
        .zip(scores)
        .enumerate()
        .filter(|(_, (_, s))| threshold.admits(*s))
        .map(|(index, (record, score))| MatchResult {
            record,
            index,
            score,
        })
        .collect();

    // Stable: ties keep candidate order.
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(
        query = query.as_str(),
        candidates = candidates.len(),
        matched = matches.len(),
        threshold = threshold.value(),
        "ranked candidates"
    );

    matches
}

#[cfg(feature = "parallel")]
fn score_all<T: Named + Sync>(query: &CanonicalName, candidates: &[T]) -> Vec<f64> {
    candidates
        .par_iter()
        .map(|c| score(query.as_str(), c.canonical_name().as_str()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_all<T: Named + Sync>(query: &CanonicalName, candidates: &[T]) -> Vec<f64> {
    candidates
        .iter()
        .map(|c| score(query.as_str(), c.canonical_name().as_str()))
        .collect()
}
