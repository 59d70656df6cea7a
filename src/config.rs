//! Gateway endpoint configuration.

use std::env;

/// Sandbox gateway used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://devapi.traxionpay.com";

/// Environment variable overriding the gateway base URL.
pub const BASE_URL_VAR: &str = "TXNPAY_BASE_URL";

/// Where the client sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    base_url: String,
}

impl GatewayConfig {
    /// Creates a configuration for the given base URL. A trailing `/` is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        GatewayConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `TXNPAY_BASE_URL`, falling back to the sandbox gateway.
    pub fn from_env() -> Self {
        match env::var(BASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => GatewayConfig::new(url.trim()),
            _ => GatewayConfig::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig::new(DEFAULT_BASE_URL)
    }
}
