//! Evidence trust status lattice.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Trust status of one evidence artifact.
///
/// A strict lattice: each level implies everything below it. Status only
/// advances through explicit operations (hash stored, chained, timestamped);
/// tamper detection never rewrites a status, it is reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityStatus {
    /// No content hash recorded.
    Unverified,
    /// Hash recorded, not yet chained.
    HashOnly,
    /// Chained without a timestamp token.
    ChainVerified,
    /// Chained and anchored to a timestamp authority.
    FullyVerified,
}

impl IntegrityStatus {
    /// Numeric lattice level (higher = more verified).
    pub fn level(&self) -> u8 {
        match self {
            Self::Unverified => 0,
            Self::HashOnly => 1,
            Self::ChainVerified => 2,
            Self::FullyVerified => 3,
        }
    }

    /// Whether this status meets a minimum level.
    pub fn meets(&self, threshold: Self) -> bool {
        self.level() >= threshold.level()
    }
}

impl PartialOrd for IntegrityStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IntegrityStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level().cmp(&other.level())
    }
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unverified => "UNVERIFIED",
            Self::HashOnly => "HASH_ONLY",
            Self::ChainVerified => "CHAIN_VERIFIED",
            Self::FullyVerified => "FULLY_VERIFIED",
        };
        f.write_str(s)
    }
}

/// Session-level chain health as reported by verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainIntegrity {
    /// Every entry verified clean.
    Valid,
    /// At least one fault was found.
    Broken,
}
