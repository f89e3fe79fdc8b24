//! PostgreSQL implementation of InvoiceRepository.
//!
//! Provides persistent storage for Invoice aggregates using PostgreSQL.
//! Superseded invoices are never deleted or mutated; only `status` and
//! `polled_at` ever change after insertion.

use crate::domain::billing::{Invoice, InvoiceStatus};
use crate::domain::foundation::{
    ContributionId, DomainError, ErrorCode, InvoiceId, Timestamp, UserId,
};
use crate::ports::InvoiceRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the InvoiceRepository port.
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    /// Creates a new PostgresInvoiceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an invoice.
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    contribution_id: Uuid,
    user_id: String,
    amount_sat: i64,
    charge_id: String,
    status: String,
    created_at: DateTime<Utc>,
    polled_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: InvoiceId::from_uuid(row.id),
            contribution_id: ContributionId::from_uuid(row.contribution_id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            amount_sat: row.amount_sat,
            charge_id: row.charge_id,
            status: parse_status(&row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            polled_at: Timestamp::from_datetime(row.polled_at),
        })
    }
}

pub(super) fn parse_status(s: &str) -> Result<InvoiceStatus, DomainError> {
    match s {
        "unpaid" => Ok(InvoiceStatus::Unpaid),
        "paid" => Ok(InvoiceStatus::Paid),
        "expired" => Ok(InvoiceStatus::Expired),
        "other" => Ok(InvoiceStatus::Other),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

pub(super) fn status_to_string(status: &InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Unpaid => "unpaid",
        InvoiceStatus::Paid => "paid",
        InvoiceStatus::Expired => "expired",
        InvoiceStatus::Other => "other",
    }
}

const SELECT_COLUMNS: &str =
    "id, contribution_id, user_id, amount_sat, charge_id, status, created_at, polled_at";

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, contribution_id, user_id, amount_sat, charge_id, status,
                created_at, polled_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.contribution_id.as_uuid())
        .bind(invoice.user_id.as_str())
        .bind(invoice.amount_sat)
        .bind(&invoice.charge_id)
        .bind(status_to_string(&invoice.status))
        .bind(invoice.created_at.as_datetime())
        .bind(invoice.polled_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save invoice: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                status = $2,
                polled_at = $3
            WHERE id = $1
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(status_to_string(&invoice.status))
        .bind(invoice.polled_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update invoice: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::InvoiceNotFound,
                "Invoice not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find invoice: {}", e),
            )
        })?;

        row.map(Invoice::try_from).transpose()
    }

    async fn find_latest_for_contribution(
        &self,
        contribution_id: &ContributionId,
    ) -> Result<Option<Invoice>, DomainError> {
        // seq breaks created_at ties in insertion order.
        let row: Option<InvoiceRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM invoices
            WHERE contribution_id = $1
            ORDER BY created_at DESC, seq DESC
            LIMIT 1
            "#
        ))
        .bind(contribution_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find latest invoice: {}", e),
            )
        })?;

        row.map(Invoice::try_from).transpose()
    }

    async fn find_latest_for_user(&self, user_id: &UserId) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM invoices
            WHERE user_id = $1
            ORDER BY created_at DESC, seq DESC
            LIMIT 1
            "#
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find latest invoice: {}", e),
            )
        })?;

        row.map(Invoice::try_from).transpose()
    }
}
