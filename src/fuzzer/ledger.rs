//! Deduplication Ledger - Content-addressed admission of candidates
//!
//! A ledger lives for exactly one generation run. Candidates are keyed by a
//! SHA-256 over their canonical serialization, so two candidates with the
//! same shape and leaf values collapse into one regardless of the strategy
//! that produced them.

use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};

use super::input::InputSet;

/// Content hash of a candidate input set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(String);

impl DedupKey {
    /// Hash a canonical serialization
    ///
    /// Returns a 64-character hex key.
    pub fn from_canonical(canonical: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn of(input: &InputSet) -> Self {
        Self::from_canonical(&input.canonical_json())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 16 hex characters, for log lines
    pub fn short(&self) -> &str {
        &self.0[..16]
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-run set of admitted candidate keys
///
/// Not shared between runs or threads.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: HashSet<DedupKey>,
    rejected: usize,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate, returning whether it was not seen before
    pub fn admit(&mut self, candidate: &InputSet) -> bool {
        self.admit_key(DedupKey::of(candidate))
    }

    pub fn admit_key(&mut self, key: DedupKey) -> bool {
        if self.seen.contains(&key) {
            tracing::debug!(key = key.short(), "Duplicate candidate rejected");
            self.rejected += 1;
            return false;
        }
        self.seen.insert(key);
        true
    }

    pub fn contains(&self, candidate: &InputSet) -> bool {
        self.seen.contains(&DedupKey::of(candidate))
    }

    /// Number of admitted candidates
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Number of rejected duplicates
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
