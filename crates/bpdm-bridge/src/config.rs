//! Bridge configuration.

use serde::{Deserialize, Serialize};

/// Settings for one bridge instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Base URL of the Gate API.
    pub gate_base_url: String,

    /// Base URL of the Pool API.
    pub pool_base_url: String,

    /// Page size for all paginated Gate calls.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_page_size() -> u32 {
    100
}

fn default_request_timeout() -> u64 {
    30
}

impl BridgeConfig {
    /// Create a configuration with default paging and timeout settings.
    pub fn new(gate_base_url: impl Into<String>, pool_base_url: impl Into<String>) -> Self {
        Self {
            gate_base_url: gate_base_url.into(),
            pool_base_url: pool_base_url.into(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Set the page size.
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Get the request timeout as a `Duration`.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let json = r#"{"gateBaseUrl": "http://gate", "poolBaseUrl": "http://pool"}"#;
        let config: BridgeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
