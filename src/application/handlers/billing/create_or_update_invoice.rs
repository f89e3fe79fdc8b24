//! CreateOrUpdateInvoiceHandler - Command handler keeping a contribution
//! backed by exactly one live invoice.
//!
//! Invoked whenever a contribution is created or its pledged amount
//! changes, and safe to call redundantly: the handler decides per
//! contribution whether to create, reuse, or replace the live invoice.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::billing::{BillingError, Contribution, Invoice, RenewalReason};
use crate::domain::foundation::{Clock, ContributionId, InvoiceId};
use crate::ports::{
    ContributionRepository, CreateChargeRequest, GatewayErrorCode, InvoiceRepository,
    LightningGateway,
};

/// Command to create or update the live invoice of a contribution.
#[derive(Debug, Clone)]
pub struct CreateOrUpdateInvoiceCommand {
    pub contribution_id: ContributionId,
}

/// Result of a create-or-update evaluation.
#[derive(Debug, Clone)]
pub struct CreateOrUpdateInvoiceResult {
    /// The authoritative invoice after the call.
    pub invoice: Invoice,

    /// True if a new invoice was created by this call.
    pub created: bool,
}

/// Handler for the create-or-update-invoice command.
///
/// # Concurrency
///
/// The whole evaluate-then-create sequence runs under a per-contribution
/// async lock, so two concurrent invocations (an amount-change save racing
/// a scheduled re-evaluation) cannot both create an invoice for the same
/// billing period. The losing side re-reads under the lock and returns the
/// winner's invoice.
pub struct CreateOrUpdateInvoiceHandler {
    contributions: Arc<dyn ContributionRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    gateway: Arc<dyn LightningGateway>,
    clock: Arc<dyn Clock>,
    locks: DashMap<ContributionId, Arc<Mutex<()>>>,
}

impl CreateOrUpdateInvoiceHandler {
    pub fn new(
        contributions: Arc<dyn ContributionRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        gateway: Arc<dyn LightningGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            contributions,
            invoices,
            gateway,
            clock,
            locks: DashMap::new(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateOrUpdateInvoiceCommand,
    ) -> Result<CreateOrUpdateInvoiceResult, BillingError> {
        // Serialize per contribution. The shard guard must not be held
        // across the await on the inner lock.
        let lock = {
            let entry = self.locks.entry(cmd.contribution_id).or_default();
            entry.clone()
        };
        let result = {
            let _guard = lock.lock().await;
            self.evaluate(cmd.contribution_id).await
        };
        drop(lock);

        // Release the table entry once nobody else holds a handle to it.
        // Any concurrent caller still interested has already cloned the
        // Arc, which keeps the strong count above one.
        self.locks
            .remove_if(&cmd.contribution_id, |_, entry| Arc::strong_count(entry) == 1);

        result
    }

    async fn evaluate(
        &self,
        contribution_id: ContributionId,
    ) -> Result<CreateOrUpdateInvoiceResult, BillingError> {
        let contribution = self
            .contributions
            .find_by_id(&contribution_id)
            .await?
            .ok_or_else(|| BillingError::contribution_not_found(contribution_id))?;

        let latest = self
            .invoices
            .find_latest_for_contribution(&contribution_id)
            .await?;
        let now = self.clock.now();

        if let Some(existing) = latest {
            match contribution.renewal_reason(Some(&existing), now) {
                None => {
                    tracing::debug!(
                        contribution_id = %contribution.id,
                        invoice_id = %existing.id,
                        "Live invoice still authoritative"
                    );
                    return Ok(CreateOrUpdateInvoiceResult {
                        invoice: existing,
                        created: false,
                    });
                }
                Some(reason) => {
                    // Superseded invoices stay untouched as history; the
                    // processor has no cancellation call.
                    tracing::info!(
                        contribution_id = %contribution.id,
                        superseded_invoice_id = %existing.id,
                        reason = ?reason,
                        "Replacing live invoice"
                    );
                }
            }
        } else {
            tracing::info!(
                contribution_id = %contribution.id,
                reason = ?RenewalReason::NoInvoice,
                "Creating first invoice"
            );
        }

        let invoice = self.create_invoice(&contribution).await?;
        Ok(CreateOrUpdateInvoiceResult {
            invoice,
            created: true,
        })
    }

    /// Create a charge at the gateway, then persist the invoice.
    ///
    /// Order matters: no invoice is persisted without a successful charge
    /// handle, so a gateway failure leaves nothing behind to clean up.
    async fn create_invoice(&self, contribution: &Contribution) -> Result<Invoice, BillingError> {
        let handle = self
            .gateway
            .create_charge(CreateChargeRequest {
                contribution_id: contribution.id,
                user_id: contribution.user_id.clone(),
                amount_sat: contribution.amount_sat,
                description: format!("Recurring contribution {}", contribution.id),
            })
            .await
            .map_err(|e| match e.code {
                GatewayErrorCode::Unavailable => BillingError::gateway_unavailable(e.message),
                GatewayErrorCode::Rejected => BillingError::charge_rejected(e.message),
            })?;

        let invoice = Invoice::create(
            InvoiceId::new(),
            contribution.id,
            contribution.user_id.clone(),
            contribution.amount_sat,
            handle.id,
            self.clock.now(),
        );

        self.invoices.save(&invoice).await?;

        tracing::info!(
            contribution_id = %contribution.id,
            invoice_id = %invoice.id,
            charge_id = %invoice.charge_id,
            amount_sat = invoice.amount_sat,
            "Invoice created"
        );

        Ok(invoice)
    }
}
