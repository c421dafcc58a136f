//! Pure construction of the next ledger entry.

use crate::canonical;
use chrono::{DateTime, Utc};
use evidentia_types::{genesis_hash, ChainEntry, EvidenceId, EvidenceRecord};
use uuid::Uuid;

/// Errors from chain entry construction.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The evidence registry has not recorded a content hash yet.
    #[error("evidence {evidence_id} has no stored content hash")]
    EvidenceNotHashed { evidence_id: EvidenceId },
}

/// Computes the next ledger entry from evidence data and the prior entry.
///
/// Pure: no I/O, no clock reads. The caller supplies the creation instant so
/// the computation is reproducible; the same instant is canonicalized into
/// the hash preimage and stored on the entry.
pub struct ChainHashBuilder;

impl ChainHashBuilder {
    /// Build the entry that follows `prior` (or the genesis entry when
    /// `prior` is `None`).
    pub fn build(
        evidence: &EvidenceRecord,
        prior: Option<&ChainEntry>,
        created_at: DateTime<Utc>,
    ) -> Result<ChainEntry, ChainError> {
        let evidence_hash = match evidence.content_hash.as_deref() {
            Some(hash) if !hash.is_empty() => hash.to_string(),
            _ => {
                return Err(ChainError::EvidenceNotHashed {
                    evidence_id: evidence.id.clone(),
                })
            }
        };

        let previous_hash = prior
            .map(|entry| entry.chain_hash.clone())
            .unwrap_or_else(genesis_hash);
        let sequence_number = prior.map(|entry| entry.sequence_number + 1).unwrap_or(0);

        let chain_hash = canonical::chain_hash(
            &evidence.id,
            &evidence_hash,
            &previous_hash,
            sequence_number,
            &evidence.session_id,
            created_at,
        );

        Ok(ChainEntry {
            id: Uuid::new_v4(),
            evidence_id: evidence.id.clone(),
            session_id: evidence.session_id.clone(),
            sequence_number,
            previous_hash,
            chain_hash,
            evidence_hash,
            timestamp_token: None,
            authority_url: None,
            created_at,
        })
    }

    /// Recompute an entry's chain hash from its own stored fields.
    ///
    /// Used by verification: a mismatch with the stored `chain_hash` means
    /// the entry was altered after it was written.
    pub fn recompute(entry: &ChainEntry) -> String {
        canonical::chain_hash(
            &entry.evidence_id,
            &entry.evidence_hash,
            &entry.previous_hash,
            entry.sequence_number,
            &entry.session_id,
            entry.created_at,
        )
    }
}
