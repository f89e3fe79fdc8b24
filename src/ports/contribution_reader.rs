//! Contribution reader port (read side / aggregate accounting).
//!
//! Read-only aggregates over persisted contribution and invoice state,
//! used for reporting. Must be recomputable at any time purely from the
//! store; nothing here mutates entities.

use crate::domain::foundation::DomainError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for contribution accounting.
#[async_trait]
pub trait ContributionReader: Send + Sync {
    /// Compute aggregate statistics over all contributions.
    async fn get_statistics(&self) -> Result<ContributionStatistics, DomainError>;
}

/// Aggregate accounting over contributions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionStatistics {
    /// Total number of contributions.
    pub total_count: u64,

    /// Contributions with a non-zero pledge and at least one paid invoice.
    pub active_count: u64,

    /// Sum of pledged satoshis over active contributions.
    pub active_pledged_sat: i64,
}
