//! Network TSA client.

use crate::{build_timestamp_request, TimestampAuthority, TimestampToken, TsaError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// Timestamp authority endpoint configuration.
#[derive(Debug, Clone)]
pub struct TsaConfig {
    /// TSA endpoint accepting `application/timestamp-query` requests.
    pub url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Full request timeout. Bounds how long a chain append can stall on
    /// the network.
    pub request_timeout: Duration,
}

impl Default for TsaConfig {
    fn default() -> Self {
        Self {
            // Free TSA for development; production deployments configure
            // their contracted authority.
            url: "https://freetsa.org/tsr".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Client posting RFC 3161 timestamp queries to a configured TSA.
pub struct RfcTimestampClient {
    http: Client,
    config: TsaConfig,
}

impl RfcTimestampClient {
    /// Build a client for the given endpoint configuration.
    pub fn new(config: TsaConfig) -> Result<Self, TsaError> {
        let http = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(format!("evidentia/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TsaError::ClientBuild)?;
        Ok(Self { http, config })
    }

    /// The configured endpoint.
    pub fn authority_url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl TimestampAuthority for RfcTimestampClient {
    async fn request_timestamp(&self, hash_hex: &str) -> Result<TimestampToken, TsaError> {
        let hash = hex::decode(hash_hex)?;
        let body = build_timestamp_request(&hash);

        debug!(url = %self.config.url, "requesting timestamp token");
        let response = self
            .http
            .post(&self.config.url)
            .header("Content-Type", "application/timestamp-query")
            .body(body)
            .send()
            .await
            .map_err(|e| TsaError::Unavailable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TsaError::Unavailable {
                reason: format!("TSA returned status {status}"),
            });
        }

        let bytes = response.bytes().await.map_err(|e| TsaError::Unavailable {
            reason: e.to_string(),
        })?;
        if bytes.is_empty() {
            return Err(TsaError::Unavailable {
                reason: "TSA returned an empty response".to_string(),
            });
        }

        debug!(token_size = bytes.len(), "timestamp token received");
        Ok(TimestampToken {
            token: STANDARD.encode(&bytes),
            timestamp: Utc::now(),
            authority_url: self.config.url.clone(),
            hash_algorithm: "SHA-256".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_free_tsa() {
        let config = TsaConfig::default();
        assert_eq!(config.url, "https://freetsa.org/tsr");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn client_builds_with_defaults() {
        assert!(RfcTimestampClient::new(TsaConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn invalid_hex_hash_is_rejected_before_any_network_io() {
        let client = RfcTimestampClient::new(TsaConfig::default()).unwrap();
        let err = client.request_timestamp("not-hex").await.unwrap_err();
        assert!(matches!(err, TsaError::InvalidHash(_)));
    }
}
