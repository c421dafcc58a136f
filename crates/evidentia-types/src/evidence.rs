//! Collaborator view of an evidence artifact.

use crate::{EvidenceId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An evidence artifact as seen by the integrity core.
///
/// The registry that stores the artifact bytes lives outside this system;
/// the chain only needs the identifiers and the content hash recorded at
/// upload time. `content_hash` is `None` until the registry has finished
/// hashing the upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    /// Evidence identifier.
    pub id: EvidenceId,
    /// Session the evidence belongs to.
    pub session_id: SessionId,
    /// Original file name, if known.
    pub file_name: Option<String>,
    /// Hex SHA-256 of the artifact content, recorded by the registry.
    pub content_hash: Option<String>,
    /// When the evidence was registered.
    pub created_at: DateTime<Utc>,
}

impl EvidenceRecord {
    /// Create a record with no hash yet.
    pub fn new(id: impl Into<EvidenceId>, session_id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            session_id: session_id.into(),
            file_name: None,
            content_hash: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the content hash.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = Some(hash.into());
        self
    }

    /// Attach the original file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Whether the registry has recorded a content hash.
    pub fn has_hash(&self) -> bool {
        self.content_hash
            .as_deref()
            .is_some_and(|h| !h.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_hash() {
        let record = EvidenceRecord::new("ev-1", "sess-1");
        assert!(!record.has_hash());
        assert!(record.file_name.is_none());
    }

    #[test]
    fn empty_hash_counts_as_missing() {
        let record = EvidenceRecord::new("ev-1", "sess-1").with_hash("");
        assert!(!record.has_hash());
    }

    #[test]
    fn record_with_hash_and_name() {
        let record = EvidenceRecord::new("ev-1", "sess-1")
            .with_hash("a".repeat(64))
            .with_file_name("scan.pdf");
        assert!(record.has_hash());
        assert_eq!(record.file_name.as_deref(), Some("scan.pdf"));
    }
}
