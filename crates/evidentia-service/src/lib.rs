//! Evidence integrity chain orchestration.
//!
//! Ties the chain builder, the append-only ledger, the timestamp authority,
//! and the verification layer together behind the operations the rest of the
//! platform consumes.

mod config;
mod logging;
mod service;
mod session_lock;

pub use config::IntegritySettings;
pub use logging::{init_tracing, LogInitError};
pub use service::{EvidenceIntegrityService, ServiceError};
pub use session_lock::SessionLocks;
