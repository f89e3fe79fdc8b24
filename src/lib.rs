//! Satpledge - Recurring Lightning contribution billing.
//!
//! Tracks recurring pledges ("contributions") and keeps each one backed by
//! exactly one live Lightning invoice at a time, created through a Lightning
//! Charge gateway and kept in sync with its settlement state via polling.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
