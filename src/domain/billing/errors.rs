//! Billing-specific error types.
//!
//! Errors related to invoice lifecycle operations and gateway interaction.
//!
//! Transient vs. permanent matters to callers: a `GatewayUnavailable` on
//! creation means nothing was persisted and the whole operation should be
//! retried; a `ChargeRejected` is permanent. Read paths never surface
//! gateway failures at all.

use crate::domain::foundation::{ContributionId, DomainError, ErrorCode, InvoiceId};

/// Billing-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Contribution was not found.
    ContributionNotFound(ContributionId),

    /// Invoice was not found.
    InvoiceNotFound(InvoiceId),

    /// The gateway could not be reached; transient, retry the operation.
    GatewayUnavailable { reason: String },

    /// The gateway refused to create the charge; permanent.
    ChargeRejected { reason: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl BillingError {
    pub fn contribution_not_found(id: ContributionId) -> Self {
        BillingError::ContributionNotFound(id)
    }

    pub fn invoice_not_found(id: InvoiceId) -> Self {
        BillingError::InvoiceNotFound(id)
    }

    pub fn gateway_unavailable(reason: impl Into<String>) -> Self {
        BillingError::GatewayUnavailable {
            reason: reason.into(),
        }
    }

    pub fn charge_rejected(reason: impl Into<String>) -> Self {
        BillingError::ChargeRejected {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BillingError::Infrastructure(message.into())
    }

    /// Returns true if retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, BillingError::GatewayUnavailable { .. })
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::ContributionNotFound(_) => ErrorCode::ContributionNotFound,
            BillingError::InvoiceNotFound(_) => ErrorCode::InvoiceNotFound,
            BillingError::GatewayUnavailable { .. } => ErrorCode::GatewayUnavailable,
            BillingError::ChargeRejected { .. } => ErrorCode::ChargeRejected,
            BillingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BillingError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingError::ContributionNotFound(id) => {
                write!(f, "Contribution {} not found", id)
            }
            BillingError::InvoiceNotFound(id) => write!(f, "Invoice {} not found", id),
            BillingError::GatewayUnavailable { reason } => {
                write!(f, "Payment gateway unavailable: {}", reason)
            }
            BillingError::ChargeRejected { reason } => {
                write!(f, "Charge rejected by gateway: {}", reason)
            }
            BillingError::ValidationFailed { field, message } => {
                write!(f, "Validation failed for '{}': {}", field, message)
            }
            BillingError::Infrastructure(message) => write!(f, "Infrastructure error: {}", message),
        }
    }
}

impl std::error::Error for BillingError {}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                BillingError::ValidationFailed {
                    field: err.details.get("field").cloned().unwrap_or_default(),
                    message: err.message,
                }
            }
            _ => BillingError::Infrastructure(err.message),
        }
    }
}
