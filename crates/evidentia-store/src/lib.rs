//! Persistence for the evidence integrity chain.
//!
//! The ledger trait deliberately exposes no update or delete: append-only is
//! enforced at the interface, and the SQLite implementation backs it with a
//! unique constraint on `(session_id, sequence_number)` so a racing writer
//! surfaces as a retryable conflict instead of a duplicated sequence.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::StoreError;
pub use memory::{MemoryChainStore, MemoryEvidenceStore};
pub use sqlite::{SqliteChainStore, SqliteEvidenceStore};
pub use traits::{ChainStore, EvidenceStore};
