//! Hash chain computation for the evidence ledger.
//!
//! The chain hash of an entry is the SHA-256 of a canonical serialization of
//! its fields. Canonicalization is the interoperability crux: the key order
//! and timestamp format are fixed here so any reimplementation produces a
//! byte-identical preimage and therefore the same digest.

mod builder;
mod canonical;

pub use builder::{ChainError, ChainHashBuilder};
pub use canonical::{canonical_json, chain_hash};
