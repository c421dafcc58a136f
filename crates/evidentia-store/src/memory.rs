//! In-memory stores for tests and air-gapped tooling.

use crate::{ChainStore, EvidenceStore, StoreError};
use evidentia_types::{ChainEntry, EvidenceId, EvidenceRecord, SessionId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory chain ledger with the same conflict semantics as SQLite.
#[derive(Default)]
pub struct MemoryChainStore {
    sessions: RwLock<HashMap<SessionId, Vec<ChainEntry>>>,
}

impl MemoryChainStore {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChainStore for MemoryChainStore {
    fn append(&self, entry: &ChainEntry) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write();
        let entries = sessions.entry(entry.session_id.clone()).or_default();

        if entries
            .iter()
            .any(|e| e.sequence_number == entry.sequence_number)
        {
            return Err(StoreError::Conflict {
                session_id: entry.session_id.clone(),
                sequence_number: entry.sequence_number,
            });
        }

        entries.push(entry.clone());
        entries.sort_by_key(|e| e.sequence_number);
        Ok(())
    }

    fn latest(&self, session_id: &SessionId) -> Result<Option<ChainEntry>, StoreError> {
        let sessions = self.sessions.read();
        Ok(sessions
            .get(session_id)
            .and_then(|entries| entries.last().cloned()))
    }

    fn all(&self, session_id: &SessionId) -> Result<Vec<ChainEntry>, StoreError> {
        let sessions = self.sessions.read();
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    fn for_evidence(&self, evidence_id: &EvidenceId) -> Result<Option<ChainEntry>, StoreError> {
        let sessions = self.sessions.read();
        Ok(sessions
            .values()
            .flatten()
            .find(|e| &e.evidence_id == evidence_id)
            .cloned())
    }
}

/// In-memory evidence registry preserving insertion order.
#[derive(Default)]
pub struct MemoryEvidenceStore {
    records: RwLock<Vec<EvidenceRecord>>,
}

impl MemoryEvidenceStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a record entirely, simulating registry-side deletion.
    pub fn remove(&self, id: &EvidenceId) {
        self.records.write().retain(|r| &r.id != id);
    }
}

impl EvidenceStore for MemoryEvidenceStore {
    fn get(&self, id: &EvidenceId) -> Result<Option<EvidenceRecord>, StoreError> {
        let records = self.records.read();
        Ok(records.iter().find(|r| &r.id == id).cloned())
    }

    fn by_session(&self, session_id: &SessionId) -> Result<Vec<EvidenceRecord>, StoreError> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| &r.session_id == session_id)
            .cloned()
            .collect())
    }

    fn upsert(&self, record: &EvidenceRecord) -> Result<(), StoreError> {
        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use evidentia_chain::ChainHashBuilder;

    fn entry(id: &str, prior: Option<&ChainEntry>) -> ChainEntry {
        let record = EvidenceRecord::new(id, "sess-1").with_hash("a".repeat(64));
        ChainHashBuilder::build(&record, prior, Utc::now()).unwrap()
    }

    #[test]
    fn conflict_on_duplicate_sequence() {
        let store = MemoryChainStore::new();
        store.append(&entry("ev-1", None)).unwrap();
        let err = store.append(&entry("ev-2", None)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn latest_follows_appends() {
        let store = MemoryChainStore::new();
        let first = entry("ev-1", None);
        store.append(&first).unwrap();
        let second = entry("ev-2", Some(&first));
        store.append(&second).unwrap();

        let latest = store.latest(&SessionId::new("sess-1")).unwrap().unwrap();
        assert_eq!(latest.sequence_number, 1);
    }

    #[test]
    fn upsert_preserves_insertion_order() {
        let store = MemoryEvidenceStore::new();
        store
            .upsert(&EvidenceRecord::new("ev-1", "sess-1"))
            .unwrap();
        store
            .upsert(&EvidenceRecord::new("ev-2", "sess-1"))
            .unwrap();
        // Replacing ev-1 must not move it to the back.
        store
            .upsert(&EvidenceRecord::new("ev-1", "sess-1").with_hash("a".repeat(64)))
            .unwrap();

        let records = store.by_session(&SessionId::new("sess-1")).unwrap();
        assert_eq!(records[0].id.as_str(), "ev-1");
        assert!(records[0].has_hash());
        assert_eq!(records[1].id.as_str(), "ev-2");
    }

    #[test]
    fn remove_simulates_registry_deletion() {
        let store = MemoryEvidenceStore::new();
        store
            .upsert(&EvidenceRecord::new("ev-1", "sess-1"))
            .unwrap();
        store.remove(&EvidenceId::new("ev-1"));
        assert!(store.get(&EvidenceId::new("ev-1")).unwrap().is_none());
    }
}
