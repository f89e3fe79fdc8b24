//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and small traits
//! that form the vocabulary of the billing domain.

mod clock;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ContributionId, InvoiceId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
