//! Lightning gateway port for external payment processing.
//!
//! Defines the contract for the payment processor integration (Lightning
//! Charge in production). Two logical calls only: create a charge, and look
//! up the settlement status of a stored charge id.
//!
//! # Design
//!
//! - **No retries inside the client**: retry policy belongs to the caller.
//!   Creation failures abort the whole operation; status-lookup failures
//!   are absorbed by the poller.
//! - **Explicit transient signaling**: every error is either `Unavailable`
//!   (retryable) or `Rejected` (permanent), and substitutes such as test
//!   doubles must preserve that distinction.

use crate::domain::billing::InvoiceStatus;
use crate::domain::foundation::{ContributionId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the external Lightning payment processor.
#[async_trait]
pub trait LightningGateway: Send + Sync {
    /// Create a charge for the given amount.
    ///
    /// Callers must not persist an invoice without a successful handle.
    async fn create_charge(
        &self,
        request: CreateChargeRequest,
    ) -> Result<ChargeHandle, GatewayError>;

    /// Fetch the current settlement status of a charge.
    ///
    /// Fails with `Unavailable` on transient network or API failure; the
    /// caller treats that as "skip this poll, keep the previous status".
    async fn fetch_status(&self, charge_id: &str) -> Result<ChargeStatus, GatewayError>;
}

/// Request to create a charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChargeRequest {
    /// Contribution being billed (stored as charge metadata).
    pub contribution_id: ContributionId,

    /// Owning user (stored as charge metadata).
    pub user_id: UserId,

    /// Amount in satoshis. Zero means an any-amount charge.
    pub amount_sat: i64,

    /// Human-readable description shown in the payer's wallet.
    pub description: String,
}

/// Handle to a charge created at the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeHandle {
    /// Processor's charge identifier, stored on the invoice.
    pub id: String,

    /// Status at creation time (normally unpaid).
    pub status: ChargeStatus,
}

/// Settlement status as reported by the processor.
///
/// Unknown status strings are preserved in `Other` rather than rejected;
/// locally only the unpaid / non-unpaid distinction matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    Unpaid,
    Paid,
    Expired,
    Other(String),
}

impl ChargeStatus {
    /// Parses a processor status string.
    pub fn from_provider(s: &str) -> Self {
        match s {
            "unpaid" => ChargeStatus::Unpaid,
            "paid" => ChargeStatus::Paid,
            "expired" => ChargeStatus::Expired,
            other => ChargeStatus::Other(other.to_string()),
        }
    }

    /// Returns true if the charge is still awaiting payment.
    pub fn is_unpaid(&self) -> bool {
        matches!(self, ChargeStatus::Unpaid)
    }
}

impl From<&ChargeStatus> for InvoiceStatus {
    fn from(status: &ChargeStatus) -> Self {
        match status {
            ChargeStatus::Unpaid => InvoiceStatus::Unpaid,
            ChargeStatus::Paid => InvoiceStatus::Paid,
            ChargeStatus::Expired => InvoiceStatus::Expired,
            ChargeStatus::Other(_) => InvoiceStatus::Other,
        }
    }
}

/// Errors from gateway operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    /// Error category.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,
}

/// Gateway error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// Transient network or API failure; the operation may be retried.
    Unavailable,

    /// The processor refused the request; retrying will not help.
    Rejected,
}

impl GatewayError {
    /// Creates a transient unavailability error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: GatewayErrorCode::Unavailable,
            message: message.into(),
        }
    }

    /// Creates a permanent rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            code: GatewayErrorCode::Rejected,
            message: message.into(),
        }
    }

    /// Returns true if the operation may be retried.
    pub fn is_transient(&self) -> bool {
        self.code == GatewayErrorCode::Unavailable
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self.code {
            GatewayErrorCode::Unavailable => "unavailable",
            GatewayErrorCode::Rejected => "rejected",
        };
        write!(f, "{}: {}", code, self.message)
    }
}

impl std::error::Error for GatewayError {}
