//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `billing` - Contribution and invoice lifecycle rules

pub mod billing;
pub mod foundation;
