//! Lightning Charge wire types.
//!
//! These types mirror the Lightning Charge REST API's JSON as it actually
//! appears on the wire. Notably, `msatoshi` comes back as a string in
//! responses even though it is sent as a number.

use serde::{Deserialize, Serialize};

/// Request body for `POST /invoice`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateChargeBody {
    /// Amount in millisatoshis. Omitted entirely for an any-amount charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msatoshi: Option<i64>,

    /// Description shown in the payer's wallet.
    pub description: String,

    /// Application metadata echoed back on fetch.
    pub metadata: ChargeMetadata,
}

/// Metadata attached to a charge, linking it back to our records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeMetadata {
    pub contribution_id: String,
    pub user_id: String,
}

/// Response body of `POST /invoice` and `GET /invoice/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeResponse {
    /// Charge identifier.
    pub id: String,

    /// Amount as a string, absent for any-amount charges.
    #[serde(default)]
    pub msatoshi: Option<String>,

    /// Status string: `unpaid`, `paid`, or `expired`.
    pub status: String,

    /// BOLT11 payment request for the payer.
    #[serde(default)]
    pub payreq: Option<String>,
}
