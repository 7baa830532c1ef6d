//! Name canonicalization for comparison.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use stockmerge_core::ValueObject;

/// Canonicalize an item name for comparison.
///
/// - Trims and lowercases
/// - Decomposes (NFD) and drops combining marks, so "Ácido" folds to "acido"
/// - Keeps only `[a-z0-9]`; any whitespace, including the ASCII information
///   separators U+001C..=U+001F, acts as a word separator
/// - Collapses separator runs to one space, with none at either end
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.trim_matches(is_separator).to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if is_separator(c) {
            pending_space = !out.is_empty();
            continue;
        }
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }

    out
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

/// Normalized representation of a name, used for comparison only.
///
/// Never displayed and never persisted as authoritative: it is always derived
/// from the raw name so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub fn from_raw(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ValueObject for CanonicalName {}

impl core::fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
