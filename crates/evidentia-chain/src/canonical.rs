//! Canonical preimage serialization.

use chrono::{DateTime, SecondsFormat, Utc};
use evidentia_types::{EvidenceId, SessionId};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hash preimage with keys in lexicographic order.
///
/// Field declaration order is the serialization order, so the fields below
/// must stay sorted by their camelCase names. The timestamp is rendered as
/// RFC 3339 with millisecond precision and a `Z` suffix, matching what
/// JavaScript's `Date.toISOString()` emits for the same instant.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalEntry<'a> {
    evidence_hash: &'a str,
    evidence_id: &'a str,
    previous_hash: &'a str,
    sequence_number: u64,
    session_id: &'a str,
    timestamp: String,
}

/// Serialize the preimage fields as compact canonical JSON.
pub fn canonical_json(
    evidence_id: &EvidenceId,
    evidence_hash: &str,
    previous_hash: &str,
    sequence_number: u64,
    session_id: &SessionId,
    timestamp: DateTime<Utc>,
) -> String {
    let entry = CanonicalEntry {
        evidence_hash,
        evidence_id: evidence_id.as_str(),
        previous_hash,
        sequence_number,
        session_id: session_id.as_str(),
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    serde_json::to_string(&entry).expect("canonical entry always serializes")
}

/// Hex SHA-256 over the canonical preimage.
pub fn chain_hash(
    evidence_id: &EvidenceId,
    evidence_hash: &str,
    previous_hash: &str,
    sequence_number: u64,
    session_id: &SessionId,
    timestamp: DateTime<Utc>,
) -> String {
    let canonical = canonical_json(
        evidence_id,
        evidence_hash,
        previous_hash,
        sequence_number,
        session_id,
        timestamp,
    );
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
