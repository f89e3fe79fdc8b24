//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Gateway
//!
//! - `LightningGateway` - Create charges and fetch settlement status
//!
//! ## Write side
//!
//! - `ContributionRepository` - Contribution aggregate persistence
//! - `InvoiceRepository` - Invoice aggregate persistence
//!
//! ## Read side
//!
//! - `InvoiceReader` - Per-user invoice listing for display
//! - `ContributionReader` - Aggregate accounting over contributions

mod contribution_reader;
mod contribution_repository;
mod invoice_reader;
mod invoice_repository;
mod lightning_gateway;

pub use contribution_reader::{ContributionReader, ContributionStatistics};
pub use contribution_repository::ContributionRepository;
pub use invoice_reader::{InvoiceReader, InvoiceView};
pub use invoice_repository::InvoiceRepository;
pub use lightning_gateway::{
    ChargeHandle, ChargeStatus, CreateChargeRequest, GatewayError, GatewayErrorCode,
    LightningGateway,
};
