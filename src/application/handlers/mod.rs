//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;

pub use billing::{
    CreateOrUpdateInvoiceCommand, CreateOrUpdateInvoiceHandler, CreateOrUpdateInvoiceResult,
    GetContributionStatsHandler, GetContributionStatsQuery, GetContributionStatsResult,
    InvoiceFilter, ListInvoicesHandler, ListInvoicesQuery, ListInvoicesResult,
    PollInvoiceCommand, PollInvoiceHandler, PollInvoiceResult, PollLatestInvoiceCommand,
    PollOutcome,
};
