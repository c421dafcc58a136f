//! Storage contracts consumed by the integrity core.

use crate::StoreError;
use evidentia_types::{ChainEntry, EvidenceId, EvidenceRecord, SessionId};

/// Append-only persistence of ordered ledger entries per session.
///
/// No update or delete exists on this trait: a chain entry is written exactly
/// once and kept forever. Implementations must reject a write whose
/// `(session_id, sequence_number)` already exists with
/// [`StoreError::Conflict`].
pub trait ChainStore: Send + Sync {
    /// Persist one entry.
    fn append(&self, entry: &ChainEntry) -> Result<(), StoreError>;

    /// Entry with the highest sequence number for the session, if any.
    fn latest(&self, session_id: &SessionId) -> Result<Option<ChainEntry>, StoreError>;

    /// All entries for the session, ascending by sequence number.
    fn all(&self, session_id: &SessionId) -> Result<Vec<ChainEntry>, StoreError>;

    /// The entry anchoring a specific evidence artifact, if chained.
    fn for_evidence(&self, evidence_id: &EvidenceId) -> Result<Option<ChainEntry>, StoreError>;
}

/// The evidence registry as seen by the integrity core.
///
/// The registry is an external collaborator; `upsert` is its own write path
/// (uploads and re-hashing happen there) and does not touch the ledger.
pub trait EvidenceStore: Send + Sync {
    /// Look up one evidence record.
    fn get(&self, id: &EvidenceId) -> Result<Option<EvidenceRecord>, StoreError>;

    /// All evidence for a session, in creation order.
    fn by_session(&self, session_id: &SessionId) -> Result<Vec<EvidenceRecord>, StoreError>;

    /// Insert or replace a record.
    fn upsert(&self, record: &EvidenceRecord) -> Result<(), StoreError>;
}
