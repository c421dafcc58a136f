//! Per-evidence trust classification.

use chrono::{DateTime, Utc};
use evidentia_types::{ChainEntry, EvidenceId, EvidenceRecord, IntegrityStatus};
use serde::{Deserialize, Serialize};

/// Derives an evidence item's trust status from its record and chain entry.
pub struct IntegrityClassifier;

impl IntegrityClassifier {
    /// Classify one evidence item on the status lattice.
    ///
    /// A ledger entry elevates the evidence only while the registry's current
    /// hash still matches the hash that was chained. Once the evidence is
    /// modified after chaining, the entry attests to content that no longer
    /// exists, so the item drops back to `HashOnly` and can never reach
    /// `FullyVerified` again, timestamped or not.
    pub fn classify(record: &EvidenceRecord, entry: Option<&ChainEntry>) -> IntegrityStatus {
        if !record.has_hash() {
            return IntegrityStatus::Unverified;
        }
        let linked =
            entry.filter(|e| record.content_hash.as_deref() == Some(e.evidence_hash.as_str()));
        match linked {
            None => IntegrityStatus::HashOnly,
            Some(e) if e.is_timestamped() => IntegrityStatus::FullyVerified,
            Some(_) => IntegrityStatus::ChainVerified,
        }
    }

    /// Build the comprehensive per-evidence integrity view.
    pub fn assess(
        record: &EvidenceRecord,
        entry: Option<&ChainEntry>,
    ) -> EvidenceIntegrityResult {
        let checks = IntegrityChecks {
            hash_stored: record.has_hash(),
            chain_linked: entry.is_some(),
            timestamped: entry.is_some_and(ChainEntry::is_timestamped),
        };

        let chain_position = entry.map(|e| ChainPosition {
            sequence_number: e.sequence_number,
            chain_hash: e.chain_hash.clone(),
            linked_at: e.created_at,
        });

        let timestamp = entry.and_then(|e| {
            e.timestamp_token.as_deref().map(|token| TimestampSummary {
                token_preview: token_preview(token),
                authority_url: e.authority_url.clone().unwrap_or_default(),
            })
        });

        EvidenceIntegrityResult {
            evidence_id: record.id.clone(),
            file_name: record
                .file_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            original_hash: record.content_hash.clone().unwrap_or_default(),
            checks,
            chain_position,
            timestamp,
            overall_status: Self::classify(record, entry),
            verified_at: Utc::now(),
        }
    }
}

fn token_preview(token: &str) -> String {
    if token.len() <= 50 {
        token.to_string()
    } else {
        format!("{}...", &token[..50])
    }
}

/// The three conditions the lattice is built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityChecks {
    /// The registry recorded a content hash.
    pub hash_stored: bool,
    /// A ledger entry anchors the evidence.
    pub chain_linked: bool,
    /// The entry carries a TSA token.
    pub timestamped: bool,
}

/// Where the evidence sits in its session chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainPosition {
    pub sequence_number: u64,
    pub chain_hash: String,
    pub linked_at: DateTime<Utc>,
}

/// Truncated view of the anchoring token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampSummary {
    pub token_preview: String,
    pub authority_url: String,
}

/// Comprehensive integrity view of one evidence item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceIntegrityResult {
    pub evidence_id: EvidenceId,
    pub file_name: String,
    pub original_hash: String,
    pub checks: IntegrityChecks,
    pub chain_position: Option<ChainPosition>,
    pub timestamp: Option<TimestampSummary>,
    pub overall_status: IntegrityStatus,
    pub verified_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_chain::ChainHashBuilder;
    use test_case::test_case;

    fn record(with_hash: bool) -> EvidenceRecord {
        let record = EvidenceRecord::new("ev-1", "sess-1");
        if with_hash {
            record.with_hash("a".repeat(64))
        } else {
            record
        }
    }

    fn entry(timestamped: bool) -> ChainEntry {
        let mut entry = ChainHashBuilder::build(&record(true), None, Utc::now()).unwrap();
        if timestamped {
            entry.timestamp_token = Some("dG9rZW4=".to_string());
            entry.authority_url = Some("https://tsa.test/tsr".to_string());
        }
        entry
    }

    #[test_case(false, false, false => IntegrityStatus::Unverified)]
    #[test_case(true, false, false => IntegrityStatus::HashOnly)]
    #[test_case(true, true, false => IntegrityStatus::ChainVerified)]
    #[test_case(true, true, true => IntegrityStatus::FullyVerified)]
    fn lattice(hash: bool, chained: bool, timestamped: bool) -> IntegrityStatus {
        let e = if chained { Some(entry(timestamped)) } else { None };
        IntegrityClassifier::classify(&record(hash), e.as_ref())
    }

    #[test]
    fn unhashed_evidence_is_unverified_even_if_chained() {
        // A chained entry without a registry hash cannot climb the lattice.
        let e = entry(true);
        assert_eq!(
            IntegrityClassifier::classify(&record(false), Some(&e)),
            IntegrityStatus::Unverified
        );
    }

    #[test]
    fn tampered_evidence_never_classifies_fully_verified() {
        let e = entry(true);
        let tampered = record(true).with_hash("f".repeat(64));
        assert_eq!(
            IntegrityClassifier::classify(&tampered, Some(&e)),
            IntegrityStatus::HashOnly
        );
    }

    #[test]
    fn assess_builds_full_view() {
        let e = entry(true);
        let result = IntegrityClassifier::assess(
            &record(true).with_file_name("scan.pdf"),
            Some(&e),
        );
        assert_eq!(result.overall_status, IntegrityStatus::FullyVerified);
        assert!(result.checks.hash_stored);
        assert!(result.checks.timestamped);
        assert_eq!(result.file_name, "scan.pdf");
        assert_eq!(result.chain_position.unwrap().sequence_number, 0);
        assert_eq!(
            result.timestamp.unwrap().authority_url,
            "https://tsa.test/tsr"
        );
    }

    #[test]
    fn assess_without_entry_has_no_position() {
        let result = IntegrityClassifier::assess(&record(true), None);
        assert_eq!(result.overall_status, IntegrityStatus::HashOnly);
        assert!(result.chain_position.is_none());
        assert!(result.timestamp.is_none());
        assert_eq!(result.file_name, "unknown");
    }

    #[test]
    fn long_token_is_truncated_in_preview() {
        let mut e = entry(false);
        e.timestamp_token = Some("A".repeat(120));
        let result = IntegrityClassifier::assess(&record(true), Some(&e));
        let preview = result.timestamp.unwrap().token_preview;
        assert_eq!(preview.len(), 53);
        assert!(preview.ends_with("..."));
    }
}
