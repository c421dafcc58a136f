//! SQLite-backed stores.

use crate::{ChainStore, EvidenceStore, StoreError};
use chrono::{DateTime, Utc};
use evidentia_types::{ChainEntry, EvidenceId, EvidenceRecord, SessionId};
use parking_lot::Mutex;
use rusqlite::{Connection, Row};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Append-only chain ledger in SQLite.
pub struct SqliteChainStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteChainStore {
    /// Create a store over an existing connection.
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Create the ledger table.
    ///
    /// The unique constraint on `(session_id, sequence_number)` is the
    /// storage-level guard against two writers claiming the same chain
    /// position.
    pub fn init_tables(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS evidence_chain (
                id TEXT PRIMARY KEY,
                evidence_id TEXT NOT NULL,
                session_id TEXT NOT NULL,
                sequence_number INTEGER NOT NULL,
                previous_hash TEXT NOT NULL,
                chain_hash TEXT NOT NULL,
                evidence_hash TEXT NOT NULL,
                timestamp_token TEXT,
                authority_url TEXT,
                created_at TEXT NOT NULL,
                UNIQUE(session_id, sequence_number)
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_evidence_chain_evidence
             ON evidence_chain (evidence_id)",
            [],
        )?;
        Ok(())
    }
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<ChainEntry> {
    let id_text: String = row.get(0)?;
    let id = Uuid::parse_str(&id_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ChainEntry {
        id,
        evidence_id: EvidenceId::new(row.get::<_, String>(1)?),
        session_id: SessionId::new(row.get::<_, String>(2)?),
        sequence_number: row.get::<_, i64>(3)? as u64,
        previous_hash: row.get(4)?,
        chain_hash: row.get(5)?,
        evidence_hash: row.get(6)?,
        timestamp_token: row.get(7)?,
        authority_url: row.get(8)?,
        created_at: row.get::<_, DateTime<Utc>>(9)?,
    })
}

impl ChainStore for SqliteChainStore {
    fn append(&self, entry: &ChainEntry) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO evidence_chain
             (id, evidence_id, session_id, sequence_number, previous_hash,
              chain_hash, evidence_hash, timestamp_token, authority_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                entry.id.to_string(),
                entry.evidence_id.as_str(),
                entry.session_id.as_str(),
                entry.sequence_number as i64,
                &entry.previous_hash,
                &entry.chain_hash,
                &entry.evidence_hash,
                &entry.timestamp_token,
                &entry.authority_url,
                entry.created_at,
            ],
        );

        match result {
            Ok(_) => {
                debug!(
                    session = %entry.session_id,
                    sequence = entry.sequence_number,
                    "chain entry appended"
                );
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Conflict {
                    session_id: entry.session_id.clone(),
                    sequence_number: entry.sequence_number,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn latest(&self, session_id: &SessionId) -> Result<Option<ChainEntry>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, evidence_id, session_id, sequence_number, previous_hash,
                    chain_hash, evidence_hash, timestamp_token, authority_url, created_at
             FROM evidence_chain
             WHERE session_id = ?1
             ORDER BY sequence_number DESC
             LIMIT 1",
        )?;
        let mut rows = stmt.query_map([session_id.as_str()], map_entry)?;
        rows.next().transpose().map_err(Into::into)
    }

    fn all(&self, session_id: &SessionId) -> Result<Vec<ChainEntry>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, evidence_id, session_id, sequence_number, previous_hash,
                    chain_hash, evidence_hash, timestamp_token, authority_url, created_at
             FROM evidence_chain
             WHERE session_id = ?1
             ORDER BY sequence_number ASC",
        )?;
        let rows = stmt.query_map([session_id.as_str()], map_entry)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn for_evidence(&self, evidence_id: &EvidenceId) -> Result<Option<ChainEntry>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, evidence_id, session_id, sequence_number, previous_hash,
                    chain_hash, evidence_hash, timestamp_token, authority_url, created_at
             FROM evidence_chain
             WHERE evidence_id = ?1
             LIMIT 1",
        )?;
        let mut rows = stmt.query_map([evidence_id.as_str()], map_entry)?;
        rows.next().transpose().map_err(Into::into)
    }
}

/// Evidence registry table in SQLite.
pub struct SqliteEvidenceStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEvidenceStore {
    /// Create a store over an existing connection.
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Create the registry table.
    pub fn init_tables(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS evidence_registry (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                file_name TEXT,
                content_hash TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<EvidenceRecord> {
    Ok(EvidenceRecord {
        id: EvidenceId::new(row.get::<_, String>(0)?),
        session_id: SessionId::new(row.get::<_, String>(1)?),
        file_name: row.get(2)?,
        content_hash: row.get(3)?,
        created_at: row.get::<_, DateTime<Utc>>(4)?,
    })
}

impl EvidenceStore for SqliteEvidenceStore {
    fn get(&self, id: &EvidenceId) -> Result<Option<EvidenceRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, session_id, file_name, content_hash, created_at
             FROM evidence_registry
             WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map([id.as_str()], map_record)?;
        rows.next().transpose().map_err(Into::into)
    }

    fn by_session(&self, session_id: &SessionId) -> Result<Vec<EvidenceRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, session_id, file_name, content_hash, created_at
             FROM evidence_registry
             WHERE session_id = ?1
             ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map([session_id.as_str()], map_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn upsert(&self, record: &EvidenceRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO evidence_registry (id, session_id, file_name, content_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                session_id = excluded.session_id,
                file_name = excluded.file_name,
                content_hash = excluded.content_hash",
            rusqlite::params![
                record.id.as_str(),
                record.session_id.as_str(),
                &record.file_name,
                &record.content_hash,
                record.created_at,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_chain::ChainHashBuilder;

    fn open_stores() -> (SqliteEvidenceStore, SqliteChainStore) {
        let conn = Arc::new(Mutex::new(
            Connection::open_in_memory().expect("in-memory database"),
        ));
        let evidence = SqliteEvidenceStore::new(Arc::clone(&conn));
        let chain = SqliteChainStore::new(conn);
        evidence.init_tables().unwrap();
        chain.init_tables().unwrap();
        (evidence, chain)
    }

    fn sample_entry(sequence: u64, prior: Option<&ChainEntry>) -> ChainEntry {
        let record = EvidenceRecord::new(format!("ev-{sequence}"), "sess-1")
            .with_hash("a".repeat(64));
        ChainHashBuilder::build(&record, prior, Utc::now()).unwrap()
    }

    #[test]
    fn append_and_read_back() {
        let (_, chain) = open_stores();
        let entry = sample_entry(0, None);
        chain.append(&entry).unwrap();

        let latest = chain.latest(&SessionId::new("sess-1")).unwrap().unwrap();
        assert_eq!(latest.chain_hash, entry.chain_hash);
        assert_eq!(latest.sequence_number, 0);
        assert_eq!(latest.id, entry.id);
    }

    #[test]
    fn duplicate_sequence_is_a_conflict() {
        let (_, chain) = open_stores();
        let first = sample_entry(0, None);
        chain.append(&first).unwrap();

        let duplicate = sample_entry(0, None);
        let err = chain.append(&duplicate).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { sequence_number: 0, .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn all_returns_ascending_order() {
        let (_, chain) = open_stores();
        let first = sample_entry(0, None);
        let second = sample_entry(1, Some(&first));
        // Write out of order; the query must still sort by sequence.
        chain.append(&second).unwrap();
        chain.append(&first).unwrap();

        let entries = chain.all(&SessionId::new("sess-1")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sequence_number, 0);
        assert_eq!(entries[1].sequence_number, 1);
    }

    #[test]
    fn for_evidence_finds_entry() {
        let (_, chain) = open_stores();
        let entry = sample_entry(0, None);
        chain.append(&entry).unwrap();

        let found = chain.for_evidence(&EvidenceId::new("ev-0")).unwrap();
        assert!(found.is_some());
        assert!(chain.for_evidence(&EvidenceId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn latest_on_empty_session_is_none() {
        let (_, chain) = open_stores();
        assert!(chain.latest(&SessionId::new("empty")).unwrap().is_none());
        assert!(chain.all(&SessionId::new("empty")).unwrap().is_empty());
    }

    #[test]
    fn evidence_upsert_replaces_hash() {
        let (evidence, _) = open_stores();
        let record = EvidenceRecord::new("ev-1", "sess-1").with_hash("a".repeat(64));
        evidence.upsert(&record).unwrap();

        let tampered = record.clone().with_hash("b".repeat(64));
        evidence.upsert(&tampered).unwrap();

        let stored = evidence.get(&EvidenceId::new("ev-1")).unwrap().unwrap();
        assert_eq!(stored.content_hash.as_deref(), Some("b".repeat(64).as_str()));
    }

    #[test]
    fn by_session_orders_by_creation() {
        let (evidence, _) = open_stores();
        let older = EvidenceRecord {
            created_at: Utc::now() - chrono::Duration::seconds(10),
            ..EvidenceRecord::new("ev-old", "sess-1")
        };
        let newer = EvidenceRecord::new("ev-new", "sess-1");
        evidence.upsert(&newer).unwrap();
        evidence.upsert(&older).unwrap();

        let records = evidence.by_session(&SessionId::new("sess-1")).unwrap();
        assert_eq!(records[0].id.as_str(), "ev-old");
        assert_eq!(records[1].id.as_str(), "ev-new");
    }
}
