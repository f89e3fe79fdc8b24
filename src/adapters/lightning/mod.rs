//! Lightning Charge gateway adapter.
//!
//! Implements the `LightningGateway` port against a Lightning Charge
//! instance over its REST API:
//! - Charge creation (`POST /invoice`)
//! - Status fetch (`GET /invoice/:id`)
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CHARGE_API_URL`: Base URL of the Lightning Charge instance
//! - `CHARGE_API_TOKEN`: API token (sent via HTTP basic auth)

mod charge_adapter;
mod charge_types;
mod mock_gateway;

pub use charge_adapter::{ChargeConfig, LightningChargeAdapter};
pub use charge_types::{ChargeMetadata, ChargeResponse, CreateChargeBody};
pub use mock_gateway::MockLightningGateway;
