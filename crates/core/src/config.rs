//! Matching/resolution configuration.
//!
//! Defaults mirror the production settings: interactive search is looser than
//! the merge decision, so a search can surface candidates the resolver would
//! still refuse to merge into.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::threshold::Threshold;

pub const ENV_SEARCH_THRESHOLD: &str = "STOCKMERGE_SEARCH_THRESHOLD";
pub const ENV_MERGE_THRESHOLD: &str = "STOCKMERGE_MERGE_THRESHOLD";
pub const ENV_GROUP_THRESHOLD: &str = "STOCKMERGE_GROUP_THRESHOLD";
pub const ENV_GROUPING_MODE: &str = "STOCKMERGE_GROUPING_MODE";
pub const ENV_MAX_RESOLVE_ATTEMPTS: &str = "STOCKMERGE_MAX_RESOLVE_ATTEMPTS";

/// How the grouper links records into clusters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// A similarity chain through any member is enough (A~B, B~C puts A with C).
    #[default]
    SingleLink,
    /// Every pair of members must clear the threshold.
    CompleteLink,
}

impl FromStr for GroupingMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single_link" => Ok(Self::SingleLink),
            "complete_link" => Ok(Self::CompleteLink),
            other => Err(DomainError::validation(format!(
                "unknown grouping mode: {other}"
            ))),
        }
    }
}

/// Thresholds and retry policy for search, grouping and ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub search_threshold: Threshold,
    pub merge_threshold: Threshold,
    pub group_threshold: Threshold,
    pub grouping_mode: GroupingMode,
    /// Upper bound on snapshot → resolve → apply rounds when writes race.
    pub max_resolve_attempts: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            search_threshold: Threshold::SEARCH,
            merge_threshold: Threshold::MERGE,
            group_threshold: Threshold::SEARCH,
            grouping_mode: GroupingMode::SingleLink,
            max_resolve_attempts: 3,
        }
    }
}

impl MatchingConfig {
    /// Load configuration from `STOCKMERGE_*` environment variables on top of defaults.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MatchingConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SEARCH_THRESHOLD) {
            config.search_threshold = parse_threshold(ENV_SEARCH_THRESHOLD, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MERGE_THRESHOLD) {
            config.merge_threshold = parse_threshold(ENV_MERGE_THRESHOLD, &raw)?;
        }
        if let Some(raw) = lookup(ENV_GROUP_THRESHOLD) {
            config.group_threshold = parse_threshold(ENV_GROUP_THRESHOLD, &raw)?;
        }
        if let Some(raw) = lookup(ENV_GROUPING_MODE) {
            config.grouping_mode = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_MAX_RESOLVE_ATTEMPTS) {
            config.max_resolve_attempts = raw.trim().parse().map_err(|e| {
                DomainError::validation(format!("{ENV_MAX_RESOLVE_ATTEMPTS}: {e}"))
            })?;
        }

        config.validate()?;
        tracing::debug!(?config, "loaded matching configuration");
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.merge_threshold < self.search_threshold {
            return Err(DomainError::validation(format!(
                "merge threshold ({}) must not be looser than search threshold ({})",
                self.merge_threshold, self.search_threshold
            )));
        }
        if self.max_resolve_attempts == 0 {
            return Err(DomainError::validation(
                "max_resolve_attempts must be at least 1",
            ));
        }
        Ok(())
    }
}

fn parse_threshold(key: &str, raw: &str) -> DomainResult<Threshold> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| DomainError::validation(format!("{key}: {e}")))?;
    Threshold::new(value)
}
