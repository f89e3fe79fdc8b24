//! PostgreSQL implementation of ContributionRepository.
//!
//! Provides persistent storage for Contribution aggregates using PostgreSQL.

use crate::domain::billing::Contribution;
use crate::domain::foundation::{ContributionId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::ContributionRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the ContributionRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresContributionRepository {
    pool: PgPool,
}

impl PostgresContributionRepository {
    /// Creates a new PostgresContributionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a contribution.
#[derive(Debug, sqlx::FromRow)]
struct ContributionRow {
    id: Uuid,
    user_id: String,
    amount_sat: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContributionRow> for Contribution {
    type Error = DomainError;

    fn try_from(row: ContributionRow) -> Result<Self, Self::Error> {
        Ok(Contribution {
            id: ContributionId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            amount_sat: row.amount_sat,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl ContributionRepository for PostgresContributionRepository {
    async fn save(&self, contribution: &Contribution) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO contributions (id, user_id, amount_sat, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(contribution.id.as_uuid())
        .bind(contribution.user_id.as_str())
        .bind(contribution.amount_sat)
        .bind(contribution.created_at.as_datetime())
        .bind(contribution.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save contribution: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, contribution: &Contribution) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE contributions SET
                amount_sat = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(contribution.id.as_uuid())
        .bind(contribution.amount_sat)
        .bind(contribution.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update contribution: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ContributionNotFound,
                "Contribution not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &ContributionId) -> Result<Option<Contribution>, DomainError> {
        let row: Option<ContributionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, amount_sat, created_at, updated_at
            FROM contributions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find contribution: {}", e),
            )
        })?;

        row.map(Contribution::try_from).transpose()
    }

    async fn list_ids(&self) -> Result<Vec<ContributionId>, DomainError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM contributions ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list contributions: {}", e),
            )
        })?;

        Ok(ids.into_iter().map(|(id,)| ContributionId::from_uuid(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_contribution() {
        let now = Utc::now();
        let row = ContributionRow {
            id: Uuid::new_v4(),
            user_id: "carol".to_string(),
            amount_sat: 1000,
            created_at: now,
            updated_at: now,
        };

        let contribution = Contribution::try_from(row).unwrap();
        assert_eq!(contribution.user_id.as_str(), "carol");
        assert_eq!(contribution.amount_sat, 1000);
    }

    #[test]
    fn row_with_blank_user_id_is_rejected() {
        let now = Utc::now();
        let row = ContributionRow {
            id: Uuid::new_v4(),
            user_id: String::new(),
            amount_sat: 1000,
            created_at: now,
            updated_at: now,
        };

        let err = Contribution::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
