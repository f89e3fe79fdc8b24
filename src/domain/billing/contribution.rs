//! Contribution aggregate entity.
//!
//! A Contribution is a recurring pledge: a user plus an amount in satoshis.
//! It owns a history of invoices, of which only the most recent is live.
//! The renewal decision below is the heart of the invoice manager: it is
//! pure, takes time as a parameter, and is evaluated against the most
//! recent invoice only.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ContributionId, DomainError, Timestamp, UserId, ValidationError,
};

use super::Invoice;

/// Interval after which an unchanged-amount contribution still requires a
/// freshly created invoice. Models monthly recurring billing.
pub const RECURRENCE_WINDOW_DAYS: i64 = 30;

/// Why the most recent invoice no longer covers the contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalReason {
    /// The contribution has no invoice yet.
    NoInvoice,

    /// The pledged amount changed since the invoice was created.
    AmountChanged,

    /// The invoice is older than the recurrence window.
    WindowElapsed,
}

/// Contribution aggregate - a recurring pledge.
///
/// # Invariants
///
/// - `amount_sat` is never negative (zero is a valid, inactive pledge)
/// - at most one owned invoice is live at any moment; liveness is decided
///   by [`Contribution::renewal_reason`] against the newest invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Unique identifier for this contribution.
    pub id: ContributionId,

    /// User who owns this contribution.
    pub user_id: UserId,

    /// Pledged amount in satoshis.
    pub amount_sat: i64,

    /// When the contribution was created.
    pub created_at: Timestamp,

    /// When the contribution was last updated.
    pub updated_at: Timestamp,
}

impl Contribution {
    /// Creates a new contribution.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative. Zero is allowed; such
    /// contributions still get invoices but never count as active.
    pub fn create(
        id: ContributionId,
        user_id: UserId,
        amount_sat: i64,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        if amount_sat < 0 {
            return Err(ValidationError::negative("amount_sat", amount_sat).into());
        }
        Ok(Self {
            id,
            user_id,
            amount_sat,
            created_at: now,
            updated_at: now,
        })
    }

    /// Changes the pledged amount.
    ///
    /// Callers must re-evaluate the live invoice afterwards; this method
    /// only mutates the pledge itself.
    pub fn change_amount(&mut self, amount_sat: i64, now: Timestamp) -> Result<(), DomainError> {
        if amount_sat < 0 {
            return Err(ValidationError::negative("amount_sat", amount_sat).into());
        }
        self.amount_sat = amount_sat;
        self.updated_at = now;
        Ok(())
    }

    /// Returns true if the pledge is non-zero.
    ///
    /// Accounting counts a contribution as active only when this holds and
    /// at least one owned invoice is paid.
    pub fn has_nonzero_pledge(&self) -> bool {
        self.amount_sat > 0
    }

    /// Decides whether the given most-recent invoice must be replaced.
    ///
    /// Returns `None` when the invoice stays authoritative (the no-op arm
    /// of create-or-update), otherwise the reason a new invoice is needed:
    /// the amount changed, or the invoice is older than
    /// [`RECURRENCE_WINDOW_DAYS`].
    pub fn renewal_reason(&self, latest: Option<&Invoice>, now: Timestamp) -> Option<RenewalReason> {
        let invoice = match latest {
            None => return Some(RenewalReason::NoInvoice),
            Some(invoice) => invoice,
        };

        if invoice.amount_sat != self.amount_sat {
            return Some(RenewalReason::AmountChanged);
        }

        if now.duration_since(&invoice.created_at) > Duration::days(RECURRENCE_WINDOW_DAYS) {
            return Some(RenewalReason::WindowElapsed);
        }

        None
    }
}
