//! Verification and classification for the evidence chain.
//!
//! Everything in this crate is a pure reader: it recomputes hashes and
//! compares them against the ledger and the evidence registry, producing
//! diagnostic reports. Detected corruption is never written back anywhere;
//! the ledger is an immutable forensic artifact and remediation happens out
//! of band.

mod classifier;
mod report;
mod verifier;

pub use classifier::{
    ChainPosition, EvidenceIntegrityResult, IntegrityChecks, IntegrityClassifier,
    TimestampSummary,
};
pub use report::{
    EvidenceIntegrityItem, ReportGenerator, SessionIntegrityReport, SessionIntegritySummary,
};
pub use verifier::ChainVerifier;
