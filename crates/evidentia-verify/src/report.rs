//! Session-wide integrity reporting.

use crate::{ChainVerifier, IntegrityClassifier};
use chrono::{DateTime, Utc};
use evidentia_store::{ChainStore, EvidenceStore, StoreError};
use evidentia_types::{
    ChainIntegrity, ChainVerificationResult, EvidenceId, IntegrityStatus, SessionId,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One evidence item's row in the session report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceIntegrityItem {
    pub evidence_id: EvidenceId,
    pub file_name: String,
    pub hash: String,
    pub has_chain_entry: bool,
    pub has_timestamp: bool,
    pub sequence_number: Option<u64>,
    pub status: IntegrityStatus,
}

/// Aggregated counters for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIntegritySummary {
    pub total_evidence: u64,
    pub chained_evidence: u64,
    pub timestamped_evidence: u64,
    pub chain_integrity: ChainIntegrity,
    pub chain_errors: u64,
}

/// Full integrity report for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIntegrityReport {
    pub session_id: SessionId,
    pub generated_at: DateTime<Utc>,
    pub summary: SessionIntegritySummary,
    pub chain_verification: ChainVerificationResult,
    pub evidence_items: Vec<EvidenceIntegrityItem>,
}

/// Builds session integrity reports from the ledger and the registry.
pub struct ReportGenerator<'a> {
    chain: &'a dyn ChainStore,
    evidence: &'a dyn EvidenceStore,
}

impl<'a> ReportGenerator<'a> {
    /// Create a generator over the two collaborator stores.
    pub fn new(chain: &'a dyn ChainStore, evidence: &'a dyn EvidenceStore) -> Self {
        Self { chain, evidence }
    }

    /// Classify every evidence item in creation order, verify the chain
    /// once, and fold both into the session summary.
    pub fn generate(&self, session_id: &SessionId) -> Result<SessionIntegrityReport, StoreError> {
        let records = self.evidence.by_session(session_id)?;
        let chain_verification = ChainVerifier::new(self.chain, self.evidence).verify(session_id)?;

        let mut evidence_items = Vec::with_capacity(records.len());
        for record in &records {
            let entry = self.chain.for_evidence(&record.id)?;
            evidence_items.push(EvidenceIntegrityItem {
                evidence_id: record.id.clone(),
                file_name: record
                    .file_name
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                hash: record.content_hash.clone().unwrap_or_default(),
                has_chain_entry: entry.is_some(),
                has_timestamp: entry
                    .as_ref()
                    .is_some_and(|e| e.timestamp_token.is_some()),
                sequence_number: entry.as_ref().map(|e| e.sequence_number),
                status: IntegrityClassifier::classify(record, entry.as_ref()),
            });
        }

        let summary = SessionIntegritySummary {
            total_evidence: evidence_items.len() as u64,
            chained_evidence: evidence_items.iter().filter(|i| i.has_chain_entry).count() as u64,
            timestamped_evidence: evidence_items.iter().filter(|i| i.has_timestamp).count() as u64,
            chain_integrity: chain_verification.integrity(),
            chain_errors: chain_verification.invalid_entries.len() as u64,
        };

        debug!(
            session = %session_id,
            total = summary.total_evidence,
            chained = summary.chained_evidence,
            "integrity report generated"
        );

        Ok(SessionIntegrityReport {
            session_id: session_id.clone(),
            generated_at: Utc::now(),
            summary,
            chain_verification,
            evidence_items,
        })
    }
}
