//! Partition a catalog into clusters of similar names.
//!
//! Default linkage is single-link: any similarity chain joins two records,
//! even if the ends of the chain would not match each other directly.
//! Pairwise scoring is `O(n²)`; catalogs are a few thousand active items.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use stockmerge_core::{DomainResult, GroupingMode, Threshold};

use crate::candidate::{Named, Stocked};
use crate::normalize::CanonicalName;
use crate::similarity::score;

/// Accented Portuguese letters preferred when suggesting a display name.
const ACCENTED: &str = "áéíóúâêîôûãõçÁÉÍÓÚÂÊÎÔÛÃÕÇ";

/// A group of records considered the same item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster<T> {
    members: Vec<T>,
    /// Input positions of `members`, ascending.
    positions: Vec<usize>,
    /// Index into `members`.
    representative: usize,
    aggregated_quantity: Option<f64>,
}

impl<T> Cluster<T> {
    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn representative(&self) -> &T {
        &self.members[self.representative]
    }

    /// Sum of member quantities; `None` for a singleton.
    pub fn aggregated_quantity(&self) -> Option<f64> {
        self.aggregated_quantity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    pub fn into_members(self) -> Vec<T> {
        self.members
    }
}

impl<T: Named> Cluster<T> {
    /// Display name to offer when consolidating the cluster.
    ///
    /// The first member (input order) spelled with accents wins, since that
    /// is usually the carefully typed one; otherwise the first member's name.
    pub fn suggested_name(&self) -> &str {
        if let [only] = self.members.as_slice() {
            return only.raw_name();
        }
        self.members
            .iter()
            .map(Named::raw_name)
            .find(|name| name.chars().any(|c| ACCENTED.contains(c)))
            .or_else(|| self.members.first().map(Named::raw_name))
            .unwrap_or_default()
    }
}

/// Single-link grouping (see [`group_with_mode`]).
pub fn group<T>(candidates: &[T], threshold: f64) -> DomainResult<Vec<Cluster<T>>>
where
    T: Stocked + Clone + Sync,
{
    group_with_mode(candidates, threshold, GroupingMode::SingleLink)
}

/// Partition `candidates` into clusters of names scoring at least `threshold`.
///
/// Every input record lands in exactly one cluster. Clusters come out ordered
/// by their earliest member, members in input order. For clusters larger than
/// one, the representative is the member with the most stock (earliest wins
/// ties) and the quantities are summed.
pub fn group_with_mode<T>(
    candidates: &[T],
    threshold: f64,
    mode: GroupingMode,
) -> DomainResult<Vec<Cluster<T>>>
where
    T: Stocked + Clone + Sync,
{
    let threshold = Threshold::new(threshold)?;
    let names: Vec<CanonicalName> = candidates.iter().map(Named::canonical_name).collect();

    let partitions = match mode {
        GroupingMode::SingleLink => single_link(&names, threshold),
        GroupingMode::CompleteLink => complete_link(&names, threshold),
    };

    let clusters: Vec<Cluster<T>> = partitions
        .into_iter()
        .map(|positions| build_cluster(candidates, positions))
        .collect();

    tracing::debug!(
        records = candidates.len(),
        clusters = clusters.len(),
        threshold = threshold.value(),
        ?mode,
        "grouped catalog"
    );

    Ok(clusters)
}

fn build_cluster<T: Stocked + Clone>(candidates: &[T], positions: Vec<usize>) -> Cluster<T> {
    let members: Vec<T> = positions.iter().map(|&i| candidates[i].clone()).collect();

    if members.len() == 1 {
        return Cluster {
            members,
            positions,
            representative: 0,
            aggregated_quantity: None,
        };
    }

    let mut representative = 0;
    for (i, member) in members.iter().enumerate().skip(1) {
        if member.quantity_available() > members[representative].quantity_available() {
            representative = i;
        }
    }
    let total = members.iter().map(Stocked::quantity_available).sum();

    Cluster {
        members,
        positions,
        representative,
        aggregated_quantity: Some(total),
    }
}

fn single_link(names: &[CanonicalName], threshold: Threshold) -> Vec<Vec<usize>> {
    let mut sets = DisjointSet::new(names.len());
    for (i, j) in linked_pairs(names, threshold) {
        sets.union(i, j);
    }

    // Slot per root, allocated in order of first appearance.
    let mut slot_of_root: Vec<Option<usize>> = vec![None; names.len()];
    let mut partitions: Vec<Vec<usize>> = Vec::new();
    for i in 0..names.len() {
        let root = sets.find(i);
        let slot = *slot_of_root[root].get_or_insert_with(|| {
            partitions.push(Vec::new());
            partitions.len() - 1
        });
        partitions[slot].push(i);
    }
    partitions
}

fn complete_link(names: &[CanonicalName], threshold: Threshold) -> Vec<Vec<usize>> {
    let mut partitions: Vec<Vec<usize>> = Vec::new();
    for i in 0..names.len() {
        let home = partitions.iter_mut().find(|members| {
            members
                .iter()
                .all(|&m| threshold.admits(score(names[m].as_str(), names[i].as_str())))
        });
        match home {
            Some(members) => members.push(i),
            None => partitions.push(vec![i]),
        }
    }
    partitions
}

/// All `(i, j)`, `i < j`, whose names clear the threshold, in `(i, j)` order.
#[cfg(feature = "parallel")]
fn linked_pairs(names: &[CanonicalName], threshold: Threshold) -> Vec<(usize, usize)> {
    let n = names.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..n)
                .filter(move |&j| threshold.admits(score(names[i].as_str(), names[j].as_str())))
                .map(move |j| (i, j))
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn linked_pairs(names: &[CanonicalName], threshold: Threshold) -> Vec<(usize, usize)> {
    let n = names.len();
    (0..n)
        .flat_map(|i| {
            (i + 1..n)
                .filter(move |&j| threshold.admits(score(names[i].as_str(), names[j].as_str())))
                .map(move |j| (i, j))
        })
        .collect()
}

/// Union-find with path halving and union by rank.
#[derive(Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            core::cmp::Ordering::Less => self.parent[ra] = rb,
            core::cmp::Ordering::Greater => self.parent[rb] = ra,
            core::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stockmerge_core::DomainError;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: String,
        qty: f64,
    }

    impl Named for Item {
        fn raw_name(&self) -> &str {
            &self.name
        }
    }

    impl Stocked for Item {
        fn quantity_available(&self) -> f64 {
            self.qty
        }
    }

    fn item(name: &str, qty: f64) -> Item {
        Item {
            name: name.to_string(),
            qty,
        }
    }

    #[test]
    fn near_duplicates_are_grouped_and_aggregated() {
        let catalog = vec![
            item("Ácido Hialurônico", 5.0),
            item("Gaze Estéril", 40.0),
            item("acido hialuronico", 8.0),
            item("ACIDO HIALURONICO!", 8.0),
        ];

        let clusters = group(&catalog, 0.9).unwrap();
        assert_eq!(clusters.len(), 2);

        let acid = &clusters[0];
        assert_eq!(acid.positions(), &[0, 2, 3]);
        assert_eq!(acid.aggregated_quantity(), Some(21.0));
        // 8.0 tie between positions 2 and 3: earliest wins
        assert_eq!(acid.representative(), &catalog[2]);
        assert_eq!(acid.suggested_name(), "Ácido Hialurônico");

        let gauze = &clusters[1];
        assert!(gauze.is_singleton());
        assert_eq!(gauze.aggregated_quantity(), None);
        assert_eq!(gauze.representative(), &catalog[1]);
    }

    #[test]
    fn single_link_chains_transitively() {
        // a~b and b~c clear 0.8, a~c does not
        let catalog = vec![item("abcdefghij", 1.0), item("abcdefghxy", 1.0), item("abcdefuvxy", 1.0)];
        assert!(score("abcdefghij", "abcdefghxy") >= 0.8);
        assert!(score("abcdefghxy", "abcdefuvxy") >= 0.8);
        assert!(score("abcdefghij", "abcdefuvxy") < 0.8);

        let single = group(&catalog, 0.8).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].len(), 3);

        let complete = group_with_mode(&catalog, 0.8, GroupingMode::CompleteLink).unwrap();
        assert_eq!(complete.len(), 2);
        assert_eq!(complete[0].positions(), &[0, 1]);
        assert_eq!(complete[1].positions(), &[2]);
    }

    #[test]
    fn suggested_name_falls_back_to_first_member() {
        let catalog = vec![item("Seringa 3ml", 1.0), item("seringa 3 ml", 2.0)];
        let clusters = group(&catalog, 0.8).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].suggested_name(), "Seringa 3ml");
        assert_eq!(clusters[0].representative(), &catalog[1]);
    }

    #[test]
    fn empty_catalog_yields_no_clusters() {
        let catalog: Vec<Item> = Vec::new();
        assert!(group(&catalog, 0.8).unwrap().is_empty());
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let catalog = vec![item("Gaze", 1.0)];
        assert!(matches!(group(&catalog, 2.0), Err(DomainError::Validation(_))));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_pairs_match_sequential_scan() {
        let names: Vec<CanonicalName> = (0..120)
            .map(|i| CanonicalName::from_raw(&format!("Seringa {}ml lote {}", i % 5, i % 7)))
            .collect();
        let threshold = Threshold::new(0.85).unwrap();

        let mut sequential = Vec::new();
        for i in 0..names.len() {
            for j in i + 1..names.len() {
                if threshold.admits(score(names[i].as_str(), names[j].as_str())) {
                    sequential.push((i, j));
                }
            }
        }
        assert_eq!(linked_pairs(&names, threshold), sequential);

        let mut sets = DisjointSet::new(names.len());
        for &(i, j) in &sequential {
            sets.union(i, j);
        }
        for partition in single_link(&names, threshold) {
            let root = sets.find(partition[0]);
            assert!(partition.iter().all(|&m| sets.find(m) == root));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        #[test]
        fn every_record_lands_in_exactly_one_cluster(
            names in prop::collection::vec("[a-c ]{0,6}", 0..16),
            threshold in 0.0f64..=1.0,
            complete in any::<bool>(),
        ) {
            let catalog: Vec<Item> = names.iter().map(|n| item(n, 1.0)).collect();
            let mode = if complete { GroupingMode::CompleteLink } else { GroupingMode::SingleLink };
            let clusters = group_with_mode(&catalog, threshold, mode).unwrap();

            let mut seen: Vec<usize> = clusters.iter().flat_map(|c| c.positions().to_vec()).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..catalog.len()).collect::<Vec<_>>());

            for c in &clusters {
                prop_assert!(!c.is_empty());
                if c.is_singleton() {
                    prop_assert_eq!(c.aggregated_quantity(), None);
                } else {
                    prop_assert_eq!(c.aggregated_quantity(), Some(c.len() as f64));
                }
            }
        }
    }
}
