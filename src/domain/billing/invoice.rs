//! Invoice aggregate entity.
//!
//! An Invoice is one payment request against the Lightning processor,
//! referenced through an opaque charge identifier. The most recent invoice
//! of a contribution is the live one; older invoices are retained as
//! history and never mutated.
//!
//! # Design Decisions
//!
//! - **Money in satoshis**: amounts are i64 smallest-unit integers
//! - **Append-mostly**: only `status` and `polled_at` ever change, and only
//!   through the poll methods below
//! - **Cooldown on the entity**: the minimum re-poll interval is a property
//!   of the invoice, enforced before any gateway call

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ContributionId, DomainError, ErrorCode, InvoiceId, StateMachine, Timestamp, UserId,
};

use super::InvoiceStatus;

/// Minimum interval between successive gateway status polls for the same
/// invoice. Callers may poll on every read; without this cooldown a busy
/// list endpoint would flood the gateway.
pub const MIN_POLL_INTERVAL_SECS: i64 = 10;

/// Invoice aggregate - one payment request for a contribution.
///
/// # Invariants
///
/// - `polled_at` is monotonically non-decreasing and always >= `created_at`
/// - once `status` leaves `Unpaid` it never changes again
/// - `charge_id` is set at construction from a successful gateway charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier for this invoice.
    pub id: InvoiceId,

    /// Contribution this invoice bills.
    pub contribution_id: ContributionId,

    /// User who owns the contribution (denormalized for per-user listing).
    pub user_id: UserId,

    /// Pledged amount in satoshis at the time this invoice was created.
    pub amount_sat: i64,

    /// Opaque charge identifier at the payment processor.
    pub charge_id: String,

    /// Current settlement status.
    pub status: InvoiceStatus,

    /// When the invoice was created.
    pub created_at: Timestamp,

    /// Last time the status was refreshed from the gateway.
    pub polled_at: Timestamp,
}

impl Invoice {
    /// Creates a new unpaid invoice from a successful gateway charge.
    ///
    /// `polled_at` starts equal to `created_at`.
    pub fn create(
        id: InvoiceId,
        contribution_id: ContributionId,
        user_id: UserId,
        amount_sat: i64,
        charge_id: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            contribution_id,
            user_id,
            amount_sat,
            charge_id: charge_id.into(),
            status: InvoiceStatus::Unpaid,
            created_at: now,
            polled_at: now,
        }
    }

    /// Returns true if the invoice is still awaiting payment.
    pub fn is_unpaid(&self) -> bool {
        self.status.is_unpaid()
    }

    /// Returns true if a gateway poll is allowed right now.
    ///
    /// A poll is due only for unpaid invoices whose last refresh is at
    /// least [`MIN_POLL_INTERVAL_SECS`] in the past.
    pub fn poll_due(&self, now: Timestamp) -> bool {
        self.is_unpaid()
            && now.duration_since(&self.polled_at) >= Duration::seconds(MIN_POLL_INTERVAL_SECS)
    }

    /// Records a status reported by the gateway and resets the cooldown.
    ///
    /// `polled_at` advances even when the reported status equals the current
    /// one, so an unchanged answer still quiets polling for the cooldown.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is already in a terminal state.
    pub fn record_status(
        &mut self,
        status: InvoiceStatus,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.status = self.status.transition_to(status).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition invoice from {:?} to {:?}",
                    self.status, status
                ),
            )
        })?;
        self.touch_polled_at(now);
        Ok(())
    }

    /// Records a failed poll attempt.
    ///
    /// Advances only `polled_at`, so a failing gateway does not cause a
    /// retry on every subsequent call. Status is left untouched.
    pub fn record_failed_poll(&mut self, now: Timestamp) {
        self.touch_polled_at(now);
    }

    // polled_at moves forward only.
    fn touch_polled_at(&mut self, now: Timestamp) {
        if now.is_after(&self.polled_at) {
            self.polled_at = now;
        }
    }
}
