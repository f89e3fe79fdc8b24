//! PollInvoiceHandler - Refreshes an invoice's settlement status from the
//! payment gateway.
//!
//! Polling is pull-based: the gateway exposes no webhooks, so status only
//! moves when somebody asks. A per-invoice cooldown keeps read-heavy
//! callers from hammering the gateway, and a transient gateway outage is
//! absorbed rather than surfaced so reads stay available.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Invoice, InvoiceStatus};
use crate::domain::foundation::{Clock, InvoiceId, UserId};
use crate::ports::{GatewayErrorCode, InvoiceRepository, LightningGateway};

/// Command to poll a specific invoice.
#[derive(Debug, Clone)]
pub struct PollInvoiceCommand {
    pub invoice_id: InvoiceId,
}

/// Command to poll the most recent invoice of a user, if any.
#[derive(Debug, Clone)]
pub struct PollLatestInvoiceCommand {
    pub user_id: UserId,
}

/// What a poll attempt actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The gateway was consulted and the stored status refreshed.
    Refreshed,

    /// Skipped: the previous poll was too recent.
    SkippedCooldown,

    /// Skipped: the invoice is settled and its status can no longer change.
    SkippedTerminal,

    /// The gateway could not be reached; only the poll clock advanced.
    GatewayUnavailable,
}

/// Result of polling an invoice.
#[derive(Debug, Clone)]
pub struct PollInvoiceResult {
    /// The invoice as stored after the poll attempt.
    pub invoice: Invoice,
    pub outcome: PollOutcome,
}

/// Handler for invoice polling commands.
pub struct PollInvoiceHandler {
    invoices: Arc<dyn InvoiceRepository>,
    gateway: Arc<dyn LightningGateway>,
    clock: Arc<dyn Clock>,
}

impl PollInvoiceHandler {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        gateway: Arc<dyn LightningGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invoices,
            gateway,
            clock,
        }
    }

    pub async fn handle(&self, cmd: PollInvoiceCommand) -> Result<PollInvoiceResult, BillingError> {
        let invoice = self
            .invoices
            .find_by_id(&cmd.invoice_id)
            .await?
            .ok_or_else(|| BillingError::invoice_not_found(cmd.invoice_id))?;

        self.poll(invoice).await
    }

    /// Polls the most recent invoice of a user. Returns `None` when the
    /// user has no invoices at all.
    pub async fn handle_latest(
        &self,
        cmd: PollLatestInvoiceCommand,
    ) -> Result<Option<PollInvoiceResult>, BillingError> {
        match self.invoices.find_latest_for_user(&cmd.user_id).await? {
            Some(invoice) => Ok(Some(self.poll(invoice).await?)),
            None => Ok(None),
        }
    }

    async fn poll(&self, mut invoice: Invoice) -> Result<PollInvoiceResult, BillingError> {
        if !invoice.is_unpaid() {
            return Ok(PollInvoiceResult {
                invoice,
                outcome: PollOutcome::SkippedTerminal,
            });
        }

        let now = self.clock.now();
        if !invoice.poll_due(now) {
            return Ok(PollInvoiceResult {
                invoice,
                outcome: PollOutcome::SkippedCooldown,
            });
        }

        match self.gateway.fetch_status(&invoice.charge_id).await {
            Ok(status) => {
                let status = InvoiceStatus::from(&status);
                invoice.record_status(status, now)?;
                self.invoices.update(&invoice).await?;

                tracing::debug!(
                    invoice_id = %invoice.id,
                    charge_id = %invoice.charge_id,
                    status = ?invoice.status,
                    "Invoice status refreshed"
                );

                Ok(PollInvoiceResult {
                    invoice,
                    outcome: PollOutcome::Refreshed,
                })
            }
            Err(e) if e.code == GatewayErrorCode::Unavailable => {
                // Advancing polled_at rate-limits retries against a down
                // gateway; the stored status stays as-is.
                invoice.record_failed_poll(now);
                self.invoices.update(&invoice).await?;

                tracing::warn!(
                    invoice_id = %invoice.id,
                    charge_id = %invoice.charge_id,
                    error = %e,
                    "Gateway unavailable during poll"
                );

                Ok(PollInvoiceResult {
                    invoice,
                    outcome: PollOutcome::GatewayUnavailable,
                })
            }
            Err(e) => Err(BillingError::charge_rejected(e.message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::MIN_POLL_INTERVAL_SECS;
    use crate::domain::foundation::{ContributionId, DomainError, ManualClock, Timestamp};
    use crate::ports::{ChargeStatus, GatewayError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex as StdMutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct InMemoryInvoiceRepository {
        invoices: StdMutex<Vec<Invoice>>,
    }

    impl InMemoryInvoiceRepository {
        fn with(invoice: Invoice) -> Self {
            Self {
                invoices: StdMutex::new(vec![invoice]),
            }
        }

        fn stored(&self, id: &InvoiceId) -> Invoice {
            self.invoices
                .lock()
                .unwrap()
                .iter()
                .find(|i| &i.id == id)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl InvoiceRepository for InMemoryInvoiceRepository {
        async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
            self.invoices.lock().unwrap().push(invoice.clone());
            Ok(())
        }

        async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
            let mut invoices = self.invoices.lock().unwrap();
            let existing = invoices.iter_mut().find(|i| i.id == invoice.id).unwrap();
            *existing = invoice.clone();
            Ok(())
        }

        async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
            Ok(self
                .invoices
                .lock()
                .unwrap()
                .iter()
                .find(|i| &i.id == id)
                .cloned())
        }

        async fn find_latest_for_contribution(
            &self,
            contribution_id: &ContributionId,
        ) -> Result<Option<Invoice>, DomainError> {
            let invoices = self.invoices.lock().unwrap();
            Ok(invoices
                .iter()
                .enumerate()
                .filter(|(_, i)| &i.contribution_id == contribution_id)
                .max_by_key(|(idx, i)| (i.created_at, *idx))
                .map(|(_, i)| i.clone()))
        }

        async fn find_latest_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Option<Invoice>, DomainError> {
            let invoices = self.invoices.lock().unwrap();
            Ok(invoices
                .iter()
                .enumerate()
                .filter(|(_, i)| &i.user_id == user_id)
                .max_by_key(|(idx, i)| (i.created_at, *idx))
                .map(|(_, i)| i.clone()))
        }
    }

    struct MockGateway {
        fetch_calls: AtomicU64,
        response: Result<ChargeStatus, GatewayError>,
    }

    impl MockGateway {
        fn returning(status: ChargeStatus) -> Self {
            Self {
                fetch_calls: AtomicU64::new(0),
                response: Ok(status),
            }
        }

        fn failing_with(err: GatewayError) -> Self {
            Self {
                fetch_calls: AtomicU64::new(0),
                response: Err(err),
            }
        }

        fn fetch_calls(&self) -> u64 {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LightningGateway for MockGateway {
        async fn create_charge(
            &self,
            _request: crate::ports::CreateChargeRequest,
        ) -> Result<crate::ports::ChargeHandle, GatewayError> {
            unimplemented!("not exercised by polling")
        }

        async fn fetch_status(&self, _charge_id: &str) -> Result<ChargeStatus, GatewayError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn base_time() -> Timestamp {
        Timestamp::from_unix_secs(1_518_652_800) // 2018-02-15
    }

    fn test_invoice(created_at: Timestamp) -> Invoice {
        Invoice::create(
            InvoiceId::new(),
            ContributionId::new(),
            UserId::new("carol").unwrap(),
            1000,
            "charge_0001",
            created_at,
        )
    }

    struct Fixture {
        invoices: Arc<InMemoryInvoiceRepository>,
        gateway: Arc<MockGateway>,
        clock: Arc<ManualClock>,
        handler: PollInvoiceHandler,
    }

    fn fixture(invoice: Invoice, gateway: MockGateway) -> Fixture {
        let invoices = Arc::new(InMemoryInvoiceRepository::with(invoice));
        let gateway = Arc::new(gateway);
        let clock = Arc::new(ManualClock::new(base_time()));
        let handler = PollInvoiceHandler::new(invoices.clone(), gateway.clone(), clock.clone());
        Fixture {
            invoices,
            gateway,
            clock,
            handler,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn refreshes_status_when_poll_is_due() {
        let invoice = test_invoice(base_time().minus_days(1));
        let invoice_id = invoice.id;
        let fx = fixture(invoice, MockGateway::returning(ChargeStatus::Paid));

        let result = fx
            .handler
            .handle(PollInvoiceCommand { invoice_id })
            .await
            .unwrap();

        assert_eq!(result.outcome, PollOutcome::Refreshed);
        assert_eq!(result.invoice.status, InvoiceStatus::Paid);
        assert_eq!(result.invoice.polled_at, base_time());
        assert_eq!(fx.invoices.stored(&invoice_id).status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn skips_gateway_within_cooldown() {
        let invoice = test_invoice(base_time());
        let invoice_id = invoice.id;
        let cmd = PollInvoiceCommand { invoice_id };
        let fx = fixture(invoice, MockGateway::returning(ChargeStatus::Paid));
        fx.clock.advance_secs(MIN_POLL_INTERVAL_SECS - 1);

        let result = fx.handler.handle(cmd).await.unwrap();

        assert_eq!(result.outcome, PollOutcome::SkippedCooldown);
        assert_eq!(result.invoice.status, InvoiceStatus::Unpaid);
        assert_eq!(result.invoice.polled_at, base_time());
        assert_eq!(fx.gateway.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn polls_again_once_cooldown_elapses() {
        let invoice = test_invoice(base_time());
        let cmd = PollInvoiceCommand { invoice_id: invoice.id };
        let fx = fixture(invoice, MockGateway::returning(ChargeStatus::Unpaid));

        fx.clock.advance_secs(MIN_POLL_INTERVAL_SECS);
        fx.handler.handle(cmd.clone()).await.unwrap();
        fx.handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(fx.gateway.fetch_calls(), 1);

        fx.clock.advance_secs(MIN_POLL_INTERVAL_SECS);
        fx.handler.handle(cmd).await.unwrap();
        assert_eq!(fx.gateway.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn settled_invoice_is_never_polled() {
        let mut invoice = test_invoice(base_time().minus_days(1));
        invoice
            .record_status(InvoiceStatus::Paid, base_time().minus_days(1))
            .unwrap();
        let polled_at_before = invoice.polled_at;
        let cmd = PollInvoiceCommand { invoice_id: invoice.id };
        let fx = fixture(invoice, MockGateway::returning(ChargeStatus::Expired));

        let result = fx.handler.handle(cmd).await.unwrap();

        assert_eq!(result.outcome, PollOutcome::SkippedTerminal);
        assert_eq!(result.invoice.status, InvoiceStatus::Paid);
        assert_eq!(result.invoice.polled_at, polled_at_before);
        assert_eq!(fx.gateway.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_provider_status_is_stored_as_other() {
        let invoice = test_invoice(base_time().minus_days(1));
        let cmd = PollInvoiceCommand { invoice_id: invoice.id };
        let fx = fixture(
            invoice,
            MockGateway::returning(ChargeStatus::Other("held".to_string())),
        );

        let result = fx.handler.handle(cmd).await.unwrap();

        assert_eq!(result.outcome, PollOutcome::Refreshed);
        assert_eq!(result.invoice.status, InvoiceStatus::Other);
    }

    #[tokio::test]
    async fn polls_latest_invoice_for_user() {
        let older = test_invoice(base_time().minus_days(2));
        let newer = test_invoice(base_time().minus_days(1));
        let newer_id = newer.id;
        let fx = fixture(older, MockGateway::returning(ChargeStatus::Paid));
        fx.invoices.save(&newer).await.unwrap();

        let result = fx
            .handler
            .handle_latest(PollLatestInvoiceCommand {
                user_id: UserId::new("carol").unwrap(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.invoice.id, newer_id);
        assert_eq!(result.invoice.status, InvoiceStatus::Paid);
        assert_eq!(fx.gateway.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn latest_poll_is_a_no_op_for_user_without_invoices() {
        let invoice = test_invoice(base_time());
        let fx = fixture(invoice, MockGateway::returning(ChargeStatus::Paid));

        let result = fx
            .handler
            .handle_latest(PollLatestInvoiceCommand {
                user_id: UserId::new("nobody").unwrap(),
            })
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(fx.gateway.fetch_calls(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn gateway_outage_advances_poll_clock_without_touching_status() {
        let invoice = test_invoice(base_time().minus_days(1));
        let invoice_id = invoice.id;
        let cmd = PollInvoiceCommand { invoice_id };
        let fx = fixture(
            invoice,
            MockGateway::failing_with(GatewayError::unavailable("connection refused")),
        );

        let result = fx.handler.handle(cmd.clone()).await.unwrap();

        assert_eq!(result.outcome, PollOutcome::GatewayUnavailable);
        assert_eq!(result.invoice.status, InvoiceStatus::Unpaid);
        assert_eq!(result.invoice.polled_at, base_time());
        let stored = fx.invoices.stored(&invoice_id);
        assert_eq!(stored.polled_at, base_time());

        // The advanced poll clock now rate-limits retries.
        let retry = fx.handler.handle(cmd).await.unwrap();
        assert_eq!(retry.outcome, PollOutcome::SkippedCooldown);
        assert_eq!(fx.gateway.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn permanent_gateway_error_fails_loudly() {
        let invoice = test_invoice(base_time().minus_days(1));
        let cmd = PollInvoiceCommand { invoice_id: invoice.id };
        let fx = fixture(
            invoice,
            MockGateway::failing_with(GatewayError::rejected("unknown charge")),
        );

        let result = fx.handler.handle(cmd).await;

        assert!(matches!(result, Err(BillingError::ChargeRejected { .. })));
    }

    #[tokio::test]
    async fn fails_when_invoice_missing() {
        let invoice = test_invoice(base_time());
        let fx = fixture(invoice, MockGateway::returning(ChargeStatus::Paid));

        let result = fx
            .handler
            .handle(PollInvoiceCommand {
                invoice_id: InvoiceId::new(),
            })
            .await;

        assert!(matches!(result, Err(BillingError::InvoiceNotFound(_))));
    }
}
