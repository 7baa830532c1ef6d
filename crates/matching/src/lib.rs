//! `stockmerge-matching`: fuzzy name matching for catalog deduplication.
//!
//! Pure, stateless building blocks, leaves first:
//! - [`normalize`]: canonical comparison form of a raw name
//! - [`score`]: contiguous-block similarity of two canonical names
//! - [`find_matches`]: rank candidates against a query
//! - [`group`]: partition candidates into similarity clusters
//!
//! Enable the `parallel` feature to score candidates on the rayon pool; the
//! output is identical either way.

pub mod candidate;
pub mod grouper;
pub mod matcher;
pub mod normalize;
pub mod similarity;

pub use candidate::{Named, Stocked};
pub use grouper::{Cluster, group, group_with_mode};
pub use matcher::{MatchResult, find_matches, rank};
pub use normalize::{CanonicalName, normalize};
pub use similarity::score;
pub use stockmerge_core::GroupingMode;
