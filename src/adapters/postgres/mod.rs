//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresContributionRepository` - Contribution aggregate storage
//! - `PostgresInvoiceRepository` - Invoice aggregate storage
//! - `PostgresInvoiceReader` - Read-optimized invoice listing
//! - `PostgresContributionReader` - Aggregate contribution accounting

mod contribution_reader;
mod contribution_repository;
mod invoice_reader;
mod invoice_repository;

pub use contribution_reader::PostgresContributionReader;
pub use contribution_repository::PostgresContributionRepository;
pub use invoice_reader::PostgresInvoiceReader;
pub use invoice_repository::PostgresInvoiceRepository;
