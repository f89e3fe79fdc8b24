//! Payment gateway configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Lightning Charge gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the Lightning Charge instance
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API token, sent via HTTP basic auth
    pub api_token: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_token.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__API_TOKEN"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ValidationError::InvalidGatewayUrl);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    "http://localhost:9112".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
