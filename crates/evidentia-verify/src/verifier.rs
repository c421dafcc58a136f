//! Full-chain verification walk.

use chrono::Utc;
use evidentia_chain::ChainHashBuilder;
use evidentia_store::{ChainStore, EvidenceStore, StoreError};
use evidentia_types::{
    genesis_hash, ChainFault, ChainValidationError, ChainVerificationResult, SessionId,
};
use tracing::{debug, warn};

fn hash_prefix(hash: &str) -> &str {
    &hash[..hash.len().min(16)]
}

/// Walks a session's ledger and classifies every discrepancy.
pub struct ChainVerifier<'a> {
    chain: &'a dyn ChainStore,
    evidence: &'a dyn EvidenceStore,
}

impl<'a> ChainVerifier<'a> {
    /// Create a verifier over the two collaborator stores.
    pub fn new(chain: &'a dyn ChainStore, evidence: &'a dyn EvidenceStore) -> Self {
        Self { chain, evidence }
    }

    /// Verify the session's entire chain.
    ///
    /// The expected previous hash always advances to the entry's own stored
    /// `chain_hash`, even when the entry is faulty. That localizes a
    /// corruption to the entry where it occurred instead of cascading false
    /// broken-chain reports through the rest of the ledger.
    pub fn verify(&self, session_id: &SessionId) -> Result<ChainVerificationResult, StoreError> {
        let entries = self.chain.all(session_id)?;
        if entries.is_empty() {
            return Ok(ChainVerificationResult::empty(session_id.clone()));
        }

        let mut invalid_entries: Vec<ChainValidationError> = Vec::new();
        let mut expected_previous_hash = genesis_hash();

        for entry in &entries {
            if entry.previous_hash != expected_previous_hash {
                invalid_entries.push(ChainValidationError {
                    sequence_number: entry.sequence_number,
                    evidence_id: entry.evidence_id.clone(),
                    fault: ChainFault::BrokenChain,
                    details: format!(
                        "expected previous hash {}... but found {}...",
                        hash_prefix(&expected_previous_hash),
                        hash_prefix(&entry.previous_hash),
                    ),
                });
            }

            let recomputed = ChainHashBuilder::recompute(entry);
            if recomputed != entry.chain_hash {
                invalid_entries.push(ChainValidationError {
                    sequence_number: entry.sequence_number,
                    evidence_id: entry.evidence_id.clone(),
                    fault: ChainFault::InvalidHash,
                    details: "chain hash mismatch, possible tampering detected".to_string(),
                });
            }

            // The evidence record may have been deleted from the registry
            // after chaining; only a surviving record can contradict the
            // chained hash.
            if let Some(record) = self.evidence.get(&entry.evidence_id)? {
                if record.content_hash.as_deref() != Some(entry.evidence_hash.as_str()) {
                    invalid_entries.push(ChainValidationError {
                        sequence_number: entry.sequence_number,
                        evidence_id: entry.evidence_id.clone(),
                        fault: ChainFault::EvidenceModified,
                        details: "evidence hash has changed since chaining".to_string(),
                    });
                }
            }

            expected_previous_hash = entry.chain_hash.clone();
        }

        let total = entries.len() as u64;
        let is_valid = invalid_entries.is_empty();
        if is_valid {
            debug!(session = %session_id, entries = total, "chain verified clean");
        } else {
            warn!(
                session = %session_id,
                faults = invalid_entries.len(),
                "chain verification found discrepancies"
            );
        }

        Ok(ChainVerificationResult {
            session_id: session_id.clone(),
            is_valid,
            total_entries: total,
            valid_entries: total.saturating_sub(invalid_entries.len() as u64),
            invalid_entries,
            verified_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_store::{MemoryChainStore, MemoryEvidenceStore};
    use evidentia_types::{ChainEntry, EvidenceRecord};

    fn chain_one(
        chain: &MemoryChainStore,
        evidence: &MemoryEvidenceStore,
        id: &str,
        prior: Option<&ChainEntry>,
    ) -> ChainEntry {
        let record = EvidenceRecord::new(id, "sess-1").with_hash("a".repeat(64));
        evidence.upsert(&record).unwrap();
        let entry = ChainHashBuilder::build(&record, prior, Utc::now()).unwrap();
        chain.append(&entry).unwrap();
        entry
    }

    #[test]
    fn empty_chain_is_trivially_valid() {
        let chain = MemoryChainStore::new();
        let evidence = MemoryEvidenceStore::new();
        let result = ChainVerifier::new(&chain, &evidence)
            .verify(&SessionId::new("sess-1"))
            .unwrap();
        assert!(result.is_valid);
        assert_eq!(result.total_entries, 0);
    }

    #[test]
    fn intact_chain_verifies_clean() {
        let chain = MemoryChainStore::new();
        let evidence = MemoryEvidenceStore::new();
        let first = chain_one(&chain, &evidence, "ev-1", None);
        let second = chain_one(&chain, &evidence, "ev-2", Some(&first));
        chain_one(&chain, &evidence, "ev-3", Some(&second));

        let result = ChainVerifier::new(&chain, &evidence)
            .verify(&SessionId::new("sess-1"))
            .unwrap();
        assert!(result.is_valid);
        assert_eq!(result.total_entries, 3);
        assert_eq!(result.valid_entries, 3);
        assert!(result.invalid_entries.is_empty());
    }

    #[test]
    fn evidence_modification_is_flagged_once_at_its_sequence() {
        let chain = MemoryChainStore::new();
        let evidence = MemoryEvidenceStore::new();
        let first = chain_one(&chain, &evidence, "ev-1", None);
        chain_one(&chain, &evidence, "ev-2", Some(&first));

        // Registry-side tampering after chaining.
        evidence
            .upsert(&EvidenceRecord::new("ev-1", "sess-1").with_hash("f".repeat(64)))
            .unwrap();

        let result = ChainVerifier::new(&chain, &evidence)
            .verify(&SessionId::new("sess-1"))
            .unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.invalid_entries.len(), 1);
        assert_eq!(result.invalid_entries[0].sequence_number, 0);
        assert_eq!(result.invalid_entries[0].fault, ChainFault::EvidenceModified);
    }

    #[test]
    fn corrupt_previous_hash_is_localized() {
        let evidence = MemoryEvidenceStore::new();
        let staging = MemoryChainStore::new();
        let first = chain_one(&staging, &evidence, "ev-1", None);
        let second = chain_one(&staging, &evidence, "ev-2", Some(&first));
        let third = chain_one(&staging, &evidence, "ev-3", Some(&second));

        // Rebuild the ledger with entry 1's previous hash corrupted.
        let chain = MemoryChainStore::new();
        let mut corrupted = second.clone();
        corrupted.previous_hash = "deadbeef".to_string();
        chain.append(&first).unwrap();
        chain.append(&corrupted).unwrap();
        chain.append(&third).unwrap();

        let result = ChainVerifier::new(&chain, &evidence)
            .verify(&SessionId::new("sess-1"))
            .unwrap();

        // Sequence 1 carries both faults (link broken, preimage altered);
        // sequence 2 is not falsely flagged because the expected hash reset
        // to the corrupted entry's stored chain hash.
        assert!(!result.is_valid);
        let flagged: Vec<u64> = result
            .invalid_entries
            .iter()
            .map(|e| e.sequence_number)
            .collect();
        assert!(flagged.iter().all(|&s| s == 1));
        assert!(result
            .invalid_entries
            .iter()
            .any(|e| e.fault == ChainFault::BrokenChain));
        assert!(result
            .invalid_entries
            .iter()
            .any(|e| e.fault == ChainFault::InvalidHash));
    }

    #[test]
    fn deleted_evidence_does_not_fail_verification() {
        let chain = MemoryChainStore::new();
        let evidence = MemoryEvidenceStore::new();
        chain_one(&chain, &evidence, "ev-1", None);
        evidence.remove(&evidentia_types::EvidenceId::new("ev-1"));

        let result = ChainVerifier::new(&chain, &evidence)
            .verify(&SessionId::new("sess-1"))
            .unwrap();
        assert!(result.is_valid);
    }
}
