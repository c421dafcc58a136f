//! The immutable ledger record linking evidence into a session chain.

use crate::{EvidenceId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a hex SHA-256 digest, and of the genesis constant.
pub const GENESIS_HASH_LEN: usize = 64;

/// The previous-hash value of a session's first entry.
pub fn genesis_hash() -> String {
    "0".repeat(GENESIS_HASH_LEN)
}

/// One link in a session's evidence chain.
///
/// Entries are created exactly once, by the chaining operation, and are never
/// mutated or deleted afterwards. The ledger is forensic storage: it outlives
/// the evidence artifact itself, and corruption detected later is reported,
/// not repaired.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    /// Row identity; not part of the hash preimage.
    pub id: Uuid,
    /// Evidence this entry anchors.
    pub evidence_id: EvidenceId,
    /// Session the chain belongs to.
    pub session_id: SessionId,
    /// 0-based position in the session chain, contiguous, no gaps.
    pub sequence_number: u64,
    /// `chain_hash` of the previous entry, or the genesis constant at 0.
    pub previous_hash: String,
    /// This entry's hash over the canonical preimage.
    pub chain_hash: String,
    /// Evidence content hash as recorded at chaining time.
    pub evidence_hash: String,
    /// Opaque base64 timestamp token, when a TSA anchored this link.
    pub timestamp_token: Option<String>,
    /// URL of the issuing timestamp authority, when anchored.
    pub authority_url: Option<String>,
    /// Creation instant; also canonicalized into the preimage.
    pub created_at: DateTime<Utc>,
}

impl ChainEntry {
    /// Whether this is the first entry of its session.
    pub fn is_first(&self) -> bool {
        self.sequence_number == 0
    }

    /// Whether a TSA token anchors this entry.
    pub fn is_timestamped(&self) -> bool {
        self.timestamp_token.is_some()
    }
}
