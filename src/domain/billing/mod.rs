//! Billing domain module.
//!
//! Owns the invoice lifecycle rules: when a contribution needs a fresh
//! invoice, when an existing one stays authoritative, and how settlement
//! status moves through its state machine.
//!
//! # Module Structure
//!
//! - `contribution` - Contribution aggregate and renewal decision
//! - `invoice` - Invoice aggregate, poll cooldown, status recording
//! - `status` - InvoiceStatus state machine
//! - `errors` - BillingError taxonomy

mod contribution;
mod errors;
mod invoice;
mod status;

pub use contribution::{Contribution, RenewalReason, RECURRENCE_WINDOW_DAYS};
pub use errors::BillingError;
pub use invoice::{Invoice, MIN_POLL_INTERVAL_SECS};
pub use status::InvoiceStatus;
