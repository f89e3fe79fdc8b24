//! Invoice status state machine.
//!
//! The processor reports settlement as a string; locally we only care about
//! the unpaid / non-unpaid distinction. Everything other than `unpaid` is
//! terminal and is never polled again.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Settlement status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Charge created, payment not yet observed. The only pollable state.
    Unpaid,

    /// Payment settled at the processor.
    Paid,

    /// Charge expired at the processor without payment.
    Expired,

    /// Any other processor-defined terminal state, treated opaquely.
    Other,
}

impl InvoiceStatus {
    /// Returns true if the invoice is still awaiting payment.
    pub fn is_unpaid(&self) -> bool {
        matches!(self, InvoiceStatus::Unpaid)
    }
}

impl StateMachine for InvoiceStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, target),
            // A poll may report the status unchanged; that still counts as a
            // valid (self-loop) transition and resets the cooldown.
            (Unpaid, Unpaid) | (Unpaid, Paid) | (Unpaid, Expired) | (Unpaid, Other)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InvoiceStatus::*;
        match self {
            Unpaid => vec![Unpaid, Paid, Expired, Other],
            Paid | Expired | Other => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaid_can_stay_unpaid() {
        assert_eq!(
            InvoiceStatus::Unpaid.transition_to(InvoiceStatus::Unpaid),
            Ok(InvoiceStatus::Unpaid)
        );
    }

    #[test]
    fn unpaid_can_settle() {
        assert_eq!(
            InvoiceStatus::Unpaid.transition_to(InvoiceStatus::Paid),
            Ok(InvoiceStatus::Paid)
        );
        assert_eq!(
            InvoiceStatus::Unpaid.transition_to(InvoiceStatus::Expired),
            Ok(InvoiceStatus::Expired)
        );
        assert_eq!(
            InvoiceStatus::Unpaid.transition_to(InvoiceStatus::Other),
            Ok(InvoiceStatus::Other)
        );
    }

    #[test]
    fn settled_states_are_terminal() {
        assert!(InvoiceStatus::Paid.is_terminal());
        assert!(InvoiceStatus::Expired.is_terminal());
        assert!(InvoiceStatus::Other.is_terminal());
        assert!(!InvoiceStatus::Unpaid.is_terminal());
    }

    #[test]
    fn paid_cannot_reopen() {
        assert!(InvoiceStatus::Paid
            .transition_to(InvoiceStatus::Unpaid)
            .is_err());
    }

    #[test]
    fn is_unpaid_only_for_unpaid() {
        assert!(InvoiceStatus::Unpaid.is_unpaid());
        assert!(!InvoiceStatus::Paid.is_unpaid());
        assert!(!InvoiceStatus::Expired.is_unpaid());
        assert!(!InvoiceStatus::Other.is_unpaid());
    }
}
