//! Test utilities for Evidentia crates.

use evidentia_types::EvidenceRecord;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Path for a throwaway SQLite database inside a temp dir.
pub fn sqlite_path(dir: &TempDir) -> PathBuf {
    dir.path().join("evidentia.db")
}

/// Hex SHA-256 of arbitrary content, for realistic evidence hashes.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// An evidence record whose hash is derived from its id.
pub fn hashed_evidence(id: &str, session: &str) -> EvidenceRecord {
    EvidenceRecord::new(id, session).with_hash(content_hash(id.as_bytes()))
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(_) => {}
        }
    };
}
