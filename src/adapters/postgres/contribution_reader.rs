//! PostgreSQL implementation of ContributionReader.
//!
//! Aggregate accounting over contributions, computed entirely in SQL from
//! stored state.

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{ContributionReader, ContributionStatistics};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of the ContributionReader port.
pub struct PostgresContributionReader {
    pool: PgPool,
}

impl PostgresContributionReader {
    /// Creates a new PostgresContributionReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row for the statistics query.
#[derive(Debug, sqlx::FromRow)]
struct StatisticsRow {
    total_count: i64,
    active_count: i64,
    active_pledged_sat: i64,
}

#[async_trait]
impl ContributionReader for PostgresContributionReader {
    async fn get_statistics(&self) -> Result<ContributionStatistics, DomainError> {
        // Active means a non-zero pledge backed by at least one paid
        // invoice, superseded invoices included.
        let row: StatisticsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_count,
                COUNT(*) FILTER (WHERE amount_sat > 0 AND has_paid) AS active_count,
                COALESCE(SUM(amount_sat) FILTER (WHERE amount_sat > 0 AND has_paid), 0)::BIGINT
                    AS active_pledged_sat
            FROM (
                SELECT c.amount_sat,
                       EXISTS (
                           SELECT 1 FROM invoices i
                           WHERE i.contribution_id = c.id AND i.status = 'paid'
                       ) AS has_paid
                FROM contributions c
            ) counted
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to compute statistics: {}", e),
            )
        })?;

        Ok(ContributionStatistics {
            total_count: row.total_count.max(0) as u64,
            active_count: row.active_count.max(0) as u64,
            active_pledged_sat: row.active_pledged_sat,
        })
    }
}
