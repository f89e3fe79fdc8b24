//! GetContributionStatsHandler - Query handler for aggregate contribution
//! statistics.
//!
//! Counts reflect stored invoice state only. Polling keeps that state
//! fresh; this handler never talks to the gateway.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::ports::{ContributionReader, ContributionStatistics};

/// Query for aggregate contribution statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetContributionStatsQuery;

/// Result of the statistics query.
#[derive(Debug, Clone)]
pub struct GetContributionStatsResult {
    pub statistics: ContributionStatistics,
}

/// Handler for the contribution statistics query.
pub struct GetContributionStatsHandler {
    reader: Arc<dyn ContributionReader>,
}

impl GetContributionStatsHandler {
    pub fn new(reader: Arc<dyn ContributionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        _query: GetContributionStatsQuery,
    ) -> Result<GetContributionStatsResult, BillingError> {
        let statistics = self.reader.get_statistics().await?;
        Ok(GetContributionStatsResult { statistics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use async_trait::async_trait;

    struct FakeContributionReader {
        statistics: Option<ContributionStatistics>,
    }

    #[async_trait]
    impl ContributionReader for FakeContributionReader {
        async fn get_statistics(&self) -> Result<ContributionStatistics, DomainError> {
            match &self.statistics {
                Some(stats) => Ok(stats.clone()),
                None => Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    "connection pool exhausted",
                )),
            }
        }
    }

    #[tokio::test]
    async fn returns_statistics_from_reader() {
        let handler = GetContributionStatsHandler::new(Arc::new(FakeContributionReader {
            statistics: Some(ContributionStatistics {
                total_count: 12,
                active_count: 7,
                active_pledged_sat: 45_000,
            }),
        }));

        let result = handler.handle(GetContributionStatsQuery).await.unwrap();

        assert_eq!(result.statistics.total_count, 12);
        assert_eq!(result.statistics.active_count, 7);
        assert_eq!(result.statistics.active_pledged_sat, 45_000);
    }

    #[tokio::test]
    async fn reader_failure_surfaces_as_infrastructure() {
        let handler =
            GetContributionStatsHandler::new(Arc::new(FakeContributionReader { statistics: None }));

        let result = handler.handle(GetContributionStatsQuery).await;

        assert!(matches!(result, Err(BillingError::Infrastructure(_))));
    }
}
