//! Storage errors.

use evidentia_types::SessionId;

/// Errors from chain and evidence persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An entry with this `(session, sequence)` already exists. The caller
    /// should re-read the latest entry and retry the append.
    #[error("chain entry already exists for session {session_id} at sequence {sequence_number}")]
    Conflict {
        session_id: SessionId,
        sequence_number: u64,
    },

    /// Underlying database failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Whether the operation may succeed if retried after a re-read.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
