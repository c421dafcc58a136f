//! Non-network authority implementations.

use crate::{TimestampAuthority, TimestampToken, TsaError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;

/// Authority for deployments without TSA access.
///
/// Every request reports unavailability, so chaining proceeds with null
/// tokens and evidence tops out at `CHAIN_VERIFIED`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTimestampAuthority;

#[async_trait]
impl TimestampAuthority for NoopTimestampAuthority {
    async fn request_timestamp(&self, _hash_hex: &str) -> Result<TimestampToken, TsaError> {
        Err(TsaError::Unavailable {
            reason: "timestamping disabled".to_string(),
        })
    }
}

/// Test authority returning a canned token for every request.
#[derive(Debug, Clone)]
pub struct StaticTimestampAuthority {
    token: String,
    authority_url: String,
}

impl StaticTimestampAuthority {
    /// Authority issuing a fixed opaque token.
    pub fn new(token_bytes: &[u8], authority_url: impl Into<String>) -> Self {
        Self {
            token: STANDARD.encode(token_bytes),
            authority_url: authority_url.into(),
        }
    }
}

impl Default for StaticTimestampAuthority {
    fn default() -> Self {
        Self::new(b"static test token", "https://tsa.test/tsr")
    }
}

#[async_trait]
impl TimestampAuthority for StaticTimestampAuthority {
    async fn request_timestamp(&self, _hash_hex: &str) -> Result<TimestampToken, TsaError> {
        Ok(TimestampToken {
            token: self.token.clone(),
            timestamp: Utc::now(),
            authority_url: self.authority_url.clone(),
            hash_algorithm: "SHA-256".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_always_reports_unavailable() {
        let authority = NoopTimestampAuthority;
        let err = authority.request_timestamp(&"a".repeat(64)).await.unwrap_err();
        assert!(matches!(err, TsaError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn static_authority_issues_canned_token() {
        let authority = StaticTimestampAuthority::default();
        let token = authority.request_timestamp(&"a".repeat(64)).await.unwrap();
        assert_eq!(token.authority_url, "https://tsa.test/tsr");
        assert_eq!(token.hash_algorithm, "SHA-256");

        let verification = authority.verify_timestamp(&token.token, &"a".repeat(64));
        assert!(verification.is_valid);
    }
}
