//! Contribution repository port (write side).
//!
//! Defines the contract for persisting and retrieving Contribution
//! aggregates. Contributions are created by the external signup flow and
//! mutated only when the pledged amount changes; they are never deleted.

use crate::domain::billing::Contribution;
use crate::domain::foundation::{ContributionId, DomainError};
use async_trait::async_trait;

/// Repository port for Contribution aggregate persistence.
#[async_trait]
pub trait ContributionRepository: Send + Sync {
    /// Save a new contribution.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, contribution: &Contribution) -> Result<(), DomainError>;

    /// Update an existing contribution (amount change).
    ///
    /// # Errors
    ///
    /// - `ContributionNotFound` if the contribution doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, contribution: &Contribution) -> Result<(), DomainError>;

    /// Find a contribution by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ContributionId) -> Result<Option<Contribution>, DomainError>;

    /// List the IDs of all contributions.
    ///
    /// Used by the billing sweep to re-evaluate every contribution.
    async fn list_ids(&self) -> Result<Vec<ContributionId>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ContributionRepository) {}
    }
}
