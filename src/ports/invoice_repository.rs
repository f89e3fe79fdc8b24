//! Invoice repository port (write side).
//!
//! Defines the contract for persisting and retrieving Invoice aggregates.
//!
//! # Ordering contract
//!
//! "Most recent" is an explicit, documented contract of this port: the
//! latest invoice is the one with the greatest `created_at` (insertion
//! order breaks ties). Implementations must not rely on incidental row
//! order.

use crate::domain::billing::Invoice;
use crate::domain::foundation::{ContributionId, DomainError, InvoiceId, UserId};
use async_trait::async_trait;

/// Repository port for Invoice aggregate persistence.
///
/// Implementations must ensure:
/// - invoices are append-only: `update` touches `status` and `polled_at`
///   only, and those move forward only
/// - `find_latest_*` honor the ordering contract above
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Save a new invoice.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// Update an existing invoice's poll state (`status`, `polled_at`).
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// Find an invoice by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError>;

    /// Find the most recently created invoice for a contribution.
    ///
    /// Returns `None` if the contribution has no invoices yet. This is the
    /// invoice the renewal decision is evaluated against.
    async fn find_latest_for_contribution(
        &self,
        contribution_id: &ContributionId,
    ) -> Result<Option<Invoice>, DomainError>;

    /// Find the most recently created invoice across all of a user's
    /// contributions.
    ///
    /// Used by read paths that opportunistically refresh the newest unpaid
    /// invoice before listing.
    async fn find_latest_for_user(&self, user_id: &UserId) -> Result<Option<Invoice>, DomainError>;
}
