//! Mock Lightning gateway for testing.
//!
//! Provides a configurable in-memory implementation of `LightningGateway`
//! for unit and integration tests. Supports:
//! - Pre-configured charge statuses
//! - Error injection per operation
//! - Call tracking

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{
    ChargeHandle, ChargeStatus, CreateChargeRequest, GatewayError, LightningGateway,
};

/// Mock Lightning gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockLightningGateway::new();
/// let handle = mock.create_charge(request).await?;
///
/// // Simulate the payer settling the charge
/// mock.set_status(&handle.id, ChargeStatus::Paid);
///
/// // Inject errors
/// mock.fail_fetch_with(GatewayError::unavailable("down for maintenance"));
/// ```
#[derive(Default)]
pub struct MockLightningGateway {
    state: Mutex<MockState>,
    create_calls: AtomicU64,
    fetch_calls: AtomicU64,
}

#[derive(Default)]
struct MockState {
    /// Charge statuses by charge ID.
    charges: HashMap<String, ChargeStatus>,

    /// Sequence number for generated charge IDs.
    next_seq: u64,

    /// Error returned by the next and subsequent `create_charge` calls.
    fail_create: Option<GatewayError>,

    /// Error returned by the next and subsequent `fetch_status` calls.
    fail_fetch: Option<GatewayError>,
}

impl MockLightningGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the stored status of an existing charge.
    pub fn set_status(&self, charge_id: &str, status: ChargeStatus) {
        let mut state = self.state.lock().unwrap();
        state.charges.insert(charge_id.to_string(), status);
    }

    /// Makes all subsequent `create_charge` calls fail with the given error.
    pub fn fail_create_with(&self, err: GatewayError) {
        self.state.lock().unwrap().fail_create = Some(err);
    }

    /// Makes all subsequent `fetch_status` calls fail with the given error.
    pub fn fail_fetch_with(&self, err: GatewayError) {
        self.state.lock().unwrap().fail_fetch = Some(err);
    }

    /// Clears any injected errors.
    pub fn recover(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_create = None;
        state.fail_fetch = None;
    }

    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LightningGateway for MockLightningGateway {
    async fn create_charge(
        &self,
        _request: CreateChargeRequest,
    ) -> Result<ChargeHandle, GatewayError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_create {
            return Err(err.clone());
        }

        state.next_seq += 1;
        let id = format!("charge_{:04}", state.next_seq);
        state.charges.insert(id.clone(), ChargeStatus::Unpaid);

        Ok(ChargeHandle {
            id,
            status: ChargeStatus::Unpaid,
        })
    }

    async fn fetch_status(&self, charge_id: &str) -> Result<ChargeStatus, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_fetch {
            return Err(err.clone());
        }

        state
            .charges
            .get(charge_id)
            .cloned()
            .ok_or_else(|| GatewayError::rejected(format!("Unknown charge: {}", charge_id)))
    }
}
