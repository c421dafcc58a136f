//! The evidence integrity service.

use crate::{IntegritySettings, SessionLocks};
use chrono::Utc;
use evidentia_chain::{ChainError, ChainHashBuilder};
use evidentia_store::{ChainStore, EvidenceStore, StoreError};
use evidentia_tsa::{NoopTimestampAuthority, RfcTimestampClient, TimestampAuthority, TsaError};
use evidentia_types::{ChainEntry, ChainVerificationResult, EvidenceId, SessionId};
use evidentia_verify::{
    ChainVerifier, EvidenceIntegrityResult, IntegrityClassifier, ReportGenerator,
    SessionIntegrityReport,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Errors surfaced by the service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The evidence registry has no record with this id.
    #[error("evidence not found: {0}")]
    EvidenceNotFound(EvidenceId),

    /// Chain entry construction refused the evidence.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Persistence failure, including an exhausted conflict retry.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// TSA client construction failed at service build time.
    #[error(transparent)]
    Tsa(#[from] TsaError),
}

/// Records evidence into per-session hash chains and answers integrity
/// queries about them.
pub struct EvidenceIntegrityService {
    evidence: Arc<dyn EvidenceStore>,
    chain: Arc<dyn ChainStore>,
    tsa: Arc<dyn TimestampAuthority>,
    locks: SessionLocks,
    append_retries: u32,
}

impl EvidenceIntegrityService {
    /// Assemble a service from its collaborators.
    pub fn new(
        evidence: Arc<dyn EvidenceStore>,
        chain: Arc<dyn ChainStore>,
        tsa: Arc<dyn TimestampAuthority>,
    ) -> Self {
        Self {
            evidence,
            chain,
            tsa,
            locks: SessionLocks::new(),
            append_retries: IntegritySettings::default().append_retries,
        }
    }

    /// Assemble a service from settings, building the configured TSA client
    /// (or the no-op authority when timestamping is disabled).
    pub fn from_settings(
        settings: &IntegritySettings,
        evidence: Arc<dyn EvidenceStore>,
        chain: Arc<dyn ChainStore>,
    ) -> Result<Self, ServiceError> {
        let tsa: Arc<dyn TimestampAuthority> = if settings.tsa_enabled {
            Arc::new(RfcTimestampClient::new(settings.tsa_config())?)
        } else {
            Arc::new(NoopTimestampAuthority)
        };
        Ok(Self {
            evidence,
            chain,
            tsa,
            locks: SessionLocks::new(),
            append_retries: settings.append_retries,
        })
    }

    /// Link evidence into the session's chain.
    ///
    /// The per-session lock serializes the read-then-append sequence; a
    /// timestamp failure is logged and swallowed so the entry still lands,
    /// just without an anchor. A store conflict (an external writer sharing
    /// the database won the race) triggers a bounded recompute-and-retry.
    pub async fn chain_evidence(
        &self,
        evidence_id: &EvidenceId,
        session_id: &SessionId,
    ) -> Result<ChainEntry, ServiceError> {
        let record = self
            .evidence
            .get(evidence_id)?
            .ok_or_else(|| ServiceError::EvidenceNotFound(evidence_id.clone()))?;
        // Chain under the session the caller named, which for re-used
        // artifacts may differ from the registry's original session.
        let mut record = record;
        record.session_id = session_id.clone();

        let _guard = self.locks.acquire(session_id).await;

        let mut attempt = 0u32;
        loop {
            let prior = self.chain.latest(session_id)?;
            let mut entry = ChainHashBuilder::build(&record, prior.as_ref(), Utc::now())?;

            match self.tsa.request_timestamp(&entry.chain_hash).await {
                Ok(token) => {
                    entry.timestamp_token = Some(token.token);
                    entry.authority_url = Some(token.authority_url);
                }
                Err(e) => {
                    warn!(
                        evidence = %evidence_id,
                        error = %e,
                        "timestamp unavailable, chaining without anchor"
                    );
                }
            }

            match self.chain.append(&entry) {
                Ok(()) => {
                    info!(
                        evidence = %evidence_id,
                        session = %session_id,
                        sequence = entry.sequence_number,
                        hash = &entry.chain_hash[..16],
                        "evidence chained"
                    );
                    return Ok(entry);
                }
                Err(StoreError::Conflict { .. }) if attempt < self.append_retries => {
                    attempt += 1;
                    debug!(
                        session = %session_id,
                        attempt,
                        "append conflict, recomputing against new latest entry"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// The session's full chain, ascending by sequence number.
    pub fn get_evidence_chain(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ChainEntry>, ServiceError> {
        Ok(self.chain.all(session_id)?)
    }

    /// Verify the integrity of the session's entire chain.
    pub fn verify_chain(
        &self,
        session_id: &SessionId,
    ) -> Result<ChainVerificationResult, ServiceError> {
        Ok(ChainVerifier::new(self.chain.as_ref(), self.evidence.as_ref()).verify(session_id)?)
    }

    /// Comprehensive integrity view of one evidence item.
    pub fn verify_evidence_integrity(
        &self,
        evidence_id: &EvidenceId,
    ) -> Result<EvidenceIntegrityResult, ServiceError> {
        let record = self
            .evidence
            .get(evidence_id)?
            .ok_or_else(|| ServiceError::EvidenceNotFound(evidence_id.clone()))?;
        let entry = self.chain.for_evidence(evidence_id)?;
        Ok(IntegrityClassifier::assess(&record, entry.as_ref()))
    }

    /// Integrity report over every evidence item in the session.
    pub fn generate_integrity_report(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionIntegrityReport, ServiceError> {
        Ok(ReportGenerator::new(self.chain.as_ref(), self.evidence.as_ref())
            .generate(session_id)?)
    }
}
