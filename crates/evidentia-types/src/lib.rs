//! Domain types for the Evidentia evidence integrity chain.

mod entry;
mod evidence;
mod id;
mod status;
mod verification;

pub use entry::{genesis_hash, ChainEntry, GENESIS_HASH_LEN};
pub use evidence::EvidenceRecord;
pub use id::{EvidenceId, SessionId};
pub use status::{ChainIntegrity, IntegrityStatus};
pub use verification::{ChainFault, ChainValidationError, ChainVerificationResult};
