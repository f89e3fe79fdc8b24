//! PostgreSQL implementation of InvoiceReader.
//!
//! Read-optimized invoice listing for display.

use crate::domain::foundation::{ContributionId, DomainError, ErrorCode, InvoiceId, Timestamp, UserId};
use crate::ports::{InvoiceReader, InvoiceView};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::invoice_repository::parse_status;

/// PostgreSQL implementation of the InvoiceReader port.
pub struct PostgresInvoiceReader {
    pool: PgPool,
}

impl PostgresInvoiceReader {
    /// Creates a new PostgresInvoiceReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row for invoice listing queries.
#[derive(Debug, sqlx::FromRow)]
struct InvoiceViewRow {
    id: Uuid,
    contribution_id: Uuid,
    amount_sat: i64,
    charge_id: String,
    status: String,
    created_at: DateTime<Utc>,
    polled_at: DateTime<Utc>,
}

impl TryFrom<InvoiceViewRow> for InvoiceView {
    type Error = DomainError;

    fn try_from(row: InvoiceViewRow) -> Result<Self, Self::Error> {
        Ok(InvoiceView {
            id: InvoiceId::from_uuid(row.id),
            contribution_id: ContributionId::from_uuid(row.contribution_id),
            amount_sat: row.amount_sat,
            charge_id: row.charge_id,
            status: parse_status(&row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            polled_at: Timestamp::from_datetime(row.polled_at),
        })
    }
}

#[async_trait]
impl InvoiceReader for PostgresInvoiceReader {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InvoiceView>, DomainError> {
        let rows: Vec<InvoiceViewRow> = sqlx::query_as(
            r#"
            SELECT id, contribution_id, amount_sat, charge_id, status, created_at, polled_at
            FROM invoices
            WHERE user_id = $1
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list invoices: {}", e),
            )
        })?;

        rows.into_iter().map(InvoiceView::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::InvoiceStatus;

    #[test]
    fn row_converts_to_view() {
        let now = Utc::now();
        let row = InvoiceViewRow {
            id: Uuid::new_v4(),
            contribution_id: Uuid::new_v4(),
            amount_sat: 1000,
            charge_id: "charge_0001".to_string(),
            status: "unpaid".to_string(),
            created_at: now,
            polled_at: now,
        };

        let view = InvoiceView::try_from(row).unwrap();
        assert_eq!(view.status, InvoiceStatus::Unpaid);
        assert_eq!(view.amount_sat, 1000);
    }
}
