//! Invoice reader port (read side / CQRS queries).
//!
//! Read-optimized invoice views for display. Listing is a pure read: it
//! never touches the gateway and never mutates state; staleness refresh is
//! the separately invokable poll operation.

use crate::domain::billing::InvoiceStatus;
use crate::domain::foundation::{ContributionId, DomainError, InvoiceId, Timestamp, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for invoice queries.
#[async_trait]
pub trait InvoiceReader: Send + Sync {
    /// List all invoices owned by a user, ordered by `created_at`
    /// descending (most recent first).
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InvoiceView>, DomainError>;
}

/// View of an invoice for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceView {
    /// Invoice ID.
    pub id: InvoiceId,

    /// Contribution this invoice bills.
    pub contribution_id: ContributionId,

    /// Amount in satoshis at creation time.
    pub amount_sat: i64,

    /// Processor's charge identifier.
    pub charge_id: String,

    /// Current settlement status.
    pub status: InvoiceStatus,

    /// When the invoice was created.
    pub created_at: Timestamp,

    /// Last status refresh from the gateway.
    pub polled_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn InvoiceReader) {}
    }
}
