//! satpledge-sweep — one-shot billing sweep.
//!
//! Walks every contribution, creates or replaces its live invoice as the
//! recurrence window dictates, then refreshes the settlement status of each
//! user's latest invoice. Intended to run from cron or a systemd timer;
//! it exits once the sweep completes.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use satpledge::adapters::lightning::{ChargeConfig, LightningChargeAdapter};
use satpledge::adapters::postgres::{
    PostgresContributionRepository, PostgresInvoiceRepository,
};
use satpledge::application::{
    CreateOrUpdateInvoiceCommand, CreateOrUpdateInvoiceHandler, PollInvoiceHandler,
    PollLatestInvoiceCommand,
};
use satpledge::config::AppConfig;
use satpledge::domain::foundation::SystemClock;
use satpledge::ports::ContributionRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let charge_config = ChargeConfig::new(&config.gateway.api_url, &config.gateway.api_token)
        .with_timeout(config.gateway.request_timeout());
    let gateway = Arc::new(LightningChargeAdapter::new(charge_config)?);

    let contributions = Arc::new(PostgresContributionRepository::new(pool.clone()));
    let invoices = Arc::new(PostgresInvoiceRepository::new(pool.clone()));
    let clock = Arc::new(SystemClock);

    let billing = CreateOrUpdateInvoiceHandler::new(
        contributions.clone(),
        invoices.clone(),
        gateway.clone(),
        clock.clone(),
    );
    let poller = PollInvoiceHandler::new(invoices.clone(), gateway, clock);

    let ids = contributions.list_ids().await?;
    tracing::info!(count = ids.len(), "Starting billing sweep");

    let mut created = 0usize;
    let mut failed = 0usize;

    for contribution_id in ids {
        match billing
            .handle(CreateOrUpdateInvoiceCommand { contribution_id })
            .await
        {
            Ok(result) => {
                if result.created {
                    created += 1;
                }
                // Refresh settlement state of whatever invoice is now
                // current; a just-created invoice is still inside its
                // cooldown and skips the gateway.
                if let Err(e) = poller
                    .handle_latest(PollLatestInvoiceCommand {
                        user_id: result.invoice.user_id.clone(),
                    })
                    .await
                {
                    tracing::warn!(
                        contribution_id = %contribution_id,
                        error = %e,
                        "Poll after sweep failed"
                    );
                }
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    contribution_id = %contribution_id,
                    error = %e,
                    "Sweep of contribution failed"
                );
            }
        }
    }

    tracing::info!(created, failed, "Billing sweep finished");
    Ok(())
}
