//! Environment-driven service configuration.

use evidentia_tsa::TsaConfig;
use std::time::Duration;

/// Settings for the integrity service.
#[derive(Debug, Clone)]
pub struct IntegritySettings {
    /// Whether to contact a TSA at all. Disabled deployments chain evidence
    /// with null tokens.
    pub tsa_enabled: bool,
    /// TSA endpoint.
    pub tsa_url: String,
    /// Full TSA request timeout in seconds; also bounds the time the
    /// per-session append lock is held across the network call.
    pub tsa_timeout_secs: u64,
    /// How many times an append conflicting with an external writer is
    /// recomputed and retried before the conflict surfaces.
    pub append_retries: u32,
}

impl Default for IntegritySettings {
    fn default() -> Self {
        Self {
            tsa_enabled: true,
            tsa_url: "https://freetsa.org/tsr".to_string(),
            tsa_timeout_secs: 30,
            append_retries: 3,
        }
    }
}

impl IntegritySettings {
    /// Read settings from `EVIDENTIA_*` environment variables, falling back
    /// to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(url) = std::env::var("EVIDENTIA_TSA_URL") {
            if !url.is_empty() {
                settings.tsa_url = url;
            }
        }
        if let Ok(enabled) = std::env::var("EVIDENTIA_TSA_ENABLED") {
            settings.tsa_enabled = enabled.to_lowercase() == "true" || enabled == "1";
        }
        if let Ok(timeout) = std::env::var("EVIDENTIA_TSA_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                settings.tsa_timeout_secs = secs;
            }
        }
        if let Ok(retries) = std::env::var("EVIDENTIA_APPEND_RETRIES") {
            if let Ok(n) = retries.parse() {
                settings.append_retries = n;
            }
        }

        settings
    }

    /// TSA client configuration derived from these settings.
    pub fn tsa_config(&self) -> TsaConfig {
        TsaConfig {
            url: self.tsa_url.clone(),
            request_timeout: Duration::from_secs(self.tsa_timeout_secs),
            ..TsaConfig::default()
        }
    }
}
