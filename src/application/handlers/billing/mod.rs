//! Billing handlers.
//!
//! Command and query handlers for the invoice lifecycle:
//!
//! ## Commands
//! - Creating or replacing a contribution's live invoice
//! - Polling an invoice's settlement status (with cooldown)
//!
//! ## Queries
//! - Listing a user's invoices, most recent first
//! - Aggregate contribution accounting

mod create_or_update_invoice;
mod get_contribution_stats;
mod list_invoices;
mod poll_invoice;

// Commands
pub use create_or_update_invoice::{
    CreateOrUpdateInvoiceCommand, CreateOrUpdateInvoiceHandler, CreateOrUpdateInvoiceResult,
};
pub use poll_invoice::{
    PollInvoiceCommand, PollInvoiceHandler, PollInvoiceResult, PollLatestInvoiceCommand,
    PollOutcome,
};

// Queries
pub use get_contribution_stats::{
    GetContributionStatsHandler, GetContributionStatsQuery, GetContributionStatsResult,
};
pub use list_invoices::{InvoiceFilter, ListInvoicesHandler, ListInvoicesQuery, ListInvoicesResult};
