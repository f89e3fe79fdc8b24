//! ListInvoicesHandler - Query handler returning a user's invoice history.
//!
//! A pure read: no gateway call, no state change. Callers who want fresh
//! settlement data run a poll command first and then list.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::UserId;
use crate::ports::{InvoiceReader, InvoiceView};

/// Which invoices to include in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvoiceFilter {
    /// All invoices, settled and superseded included.
    #[default]
    All,

    /// Only invoices still awaiting payment.
    UnpaidOnly,
}

/// Query for a user's invoices.
#[derive(Debug, Clone)]
pub struct ListInvoicesQuery {
    pub user_id: UserId,
    pub filter: InvoiceFilter,
}

/// Result of listing invoices, most recent first.
#[derive(Debug, Clone)]
pub struct ListInvoicesResult {
    pub invoices: Vec<InvoiceView>,
}

/// Handler for the list-invoices query.
pub struct ListInvoicesHandler {
    reader: Arc<dyn InvoiceReader>,
}

impl ListInvoicesHandler {
    pub fn new(reader: Arc<dyn InvoiceReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListInvoicesQuery) -> Result<ListInvoicesResult, BillingError> {
        let mut invoices = self.reader.list_for_user(&query.user_id).await?;

        if query.filter == InvoiceFilter::UnpaidOnly {
            invoices.retain(|i| i.status.is_unpaid());
        }

        Ok(ListInvoicesResult { invoices })
    }
}
