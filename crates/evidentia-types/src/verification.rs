//! Chain verification results.

use crate::{ChainIntegrity, EvidenceId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of discrepancy found at one ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainFault {
    /// `previous_hash` does not match the prior entry's `chain_hash`.
    BrokenChain,
    /// Stored `chain_hash` does not match the recomputed canonical hash.
    InvalidHash,
    /// The evidence store's current hash differs from the chained hash.
    EvidenceModified,
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BrokenChain => "BROKEN_CHAIN",
            Self::InvalidHash => "INVALID_HASH",
            Self::EvidenceModified => "EVIDENCE_MODIFIED",
        };
        f.write_str(s)
    }
}

/// One fault located at a specific ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainValidationError {
    /// Sequence number of the faulty entry.
    pub sequence_number: u64,
    /// Evidence the entry anchors.
    pub evidence_id: EvidenceId,
    /// What kind of discrepancy was found.
    pub fault: ChainFault,
    /// Human-readable detail for the forensic report.
    pub details: String,
}

/// Outcome of verifying a session's full chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainVerificationResult {
    /// Session that was verified.
    pub session_id: SessionId,
    /// True when no faults were found. An empty chain is trivially valid.
    pub is_valid: bool,
    /// Number of ledger entries examined.
    pub total_entries: u64,
    /// Entries with no fault recorded against them.
    pub valid_entries: u64,
    /// Every fault found, in ledger order.
    pub invalid_entries: Vec<ChainValidationError>,
    /// When verification ran.
    pub verified_at: DateTime<Utc>,
}

impl ChainVerificationResult {
    /// Result for a session with no ledger entries.
    pub fn empty(session_id: SessionId) -> Self {
        Self {
            session_id,
            is_valid: true,
            total_entries: 0,
            valid_entries: 0,
            invalid_entries: Vec::new(),
            verified_at: Utc::now(),
        }
    }

    /// Collapse into the session-level health flag.
    pub fn integrity(&self) -> ChainIntegrity {
        if self.is_valid {
            ChainIntegrity::Valid
        } else {
            ChainIntegrity::Broken
        }
    }
}
