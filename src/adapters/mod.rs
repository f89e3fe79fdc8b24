//! Adapters layer - Infrastructure implementations of ports.
//!
//! Contains concrete implementations of the port traits:
//! - `lightning`: Lightning Charge payment gateway (plus a test mock)
//! - `postgres`: PostgreSQL repositories and readers

pub mod lightning;
pub mod postgres;
