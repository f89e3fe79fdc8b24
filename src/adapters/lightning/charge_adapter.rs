//! Lightning Charge gateway adapter.
//!
//! Implements the `LightningGateway` trait against the Lightning Charge
//! REST API. All requests authenticate via HTTP basic auth with the fixed
//! username `api-token`.
//!
//! # Error mapping
//!
//! - Network failures and 5xx responses become `Unavailable` (transient)
//! - 4xx responses become `Rejected` (permanent)
//!
//! # Configuration
//!
//! ```ignore
//! let config = ChargeConfig::new("http://localhost:9112", api_token);
//! let adapter = LightningChargeAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    ChargeHandle, ChargeStatus, CreateChargeRequest, GatewayError, LightningGateway,
};

use super::charge_types::{ChargeMetadata, ChargeResponse, CreateChargeBody};

/// Basic auth username expected by Lightning Charge.
const API_USER: &str = "api-token";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Lightning Charge API configuration.
#[derive(Clone)]
pub struct ChargeConfig {
    /// Base URL of the Lightning Charge instance.
    api_url: String,

    /// API token, sent as the basic auth password.
    api_token: SecretString,

    /// Per-request timeout.
    request_timeout: Duration,
}

impl ChargeConfig {
    /// Create a new configuration.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: SecretString::new(api_token.into()),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `CHARGE_API_URL` (optional, defaults to http://localhost:9112)
    /// - `CHARGE_API_TOKEN`
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let api_url = std::env::var("CHARGE_API_URL")
            .unwrap_or_else(|_| "http://localhost:9112".to_string());
        let api_token = std::env::var("CHARGE_API_TOKEN")?;

        Ok(Self::new(api_url, api_token))
    }

    /// Set a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Lightning Charge gateway adapter.
pub struct LightningChargeAdapter {
    config: ChargeConfig,
    http_client: reqwest::Client,
}

impl LightningChargeAdapter {
    /// Create a new adapter with the given configuration.
    pub fn new(config: ChargeConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Classify a non-success HTTP response, consuming its body for the
    /// error message.
    async fn classify_failure(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_client_error() {
            GatewayError::rejected(format!("{}: {}", status, body))
        } else {
            GatewayError::unavailable(format!("{}: {}", status, body))
        }
    }
}

#[async_trait]
impl LightningGateway for LightningChargeAdapter {
    async fn create_charge(
        &self,
        request: CreateChargeRequest,
    ) -> Result<ChargeHandle, GatewayError> {
        let url = format!("{}/invoice", self.config.api_url);

        let body = CreateChargeBody {
            // Zero satoshis means an any-amount charge, expressed on the
            // wire by omitting msatoshi entirely.
            msatoshi: (request.amount_sat > 0).then(|| request.amount_sat * 1000),
            description: request.description,
            metadata: ChargeMetadata {
                contribution_id: request.contribution_id.to_string(),
                user_id: request.user_id.as_str().to_string(),
            },
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(API_USER, Some(self.config.api_token.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let err = Self::classify_failure(response).await;
            tracing::error!(error = %err, "Lightning Charge create_charge failed");
            return Err(err);
        }

        let charge: ChargeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::unavailable(format!("Invalid charge response: {}", e)))?;

        Ok(ChargeHandle {
            id: charge.id,
            status: ChargeStatus::from_provider(&charge.status),
        })
    }

    async fn fetch_status(&self, charge_id: &str) -> Result<ChargeStatus, GatewayError> {
        let url = format!("{}/invoice/{}", self.config.api_url, charge_id);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(API_USER, Some(self.config.api_token.expose_secret()))
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let err = Self::classify_failure(response).await;
            tracing::warn!(charge_id = %charge_id, error = %err, "Lightning Charge fetch_status failed");
            return Err(err);
        }

        let charge: ChargeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::unavailable(format!("Invalid charge response: {}", e)))?;

        Ok(ChargeStatus::from_provider(&charge.status))
    }
}
