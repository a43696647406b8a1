// One dashboard request: read the clock once, run the five reducers concurrently
// against the request's provider client, aggregate, then save exactly once.
// The fan-out is bounded by a timeout; dropping the joined future cancels the
// in-flight provider calls.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::aggregator::{MetricResults, aggregate};
use crate::config::{AppConfig, FailurePolicy};
use crate::error::{AggregateError, DashboardError};
use crate::models::{Metric, StoredSnapshot};
use crate::provider::ProviderClient;
use crate::reducers::ReducerSet;
use crate::snapshot_repo::SnapshotStore;
use crate::window::Clock;

/// Aggregation behaviour.
#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    pub policy: FailurePolicy,
    pub timeout: Duration,
}

impl DashboardConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            policy: config.aggregation.policy,
            timeout: Duration::from_secs(config.aggregation.timeout_secs),
        }
    }
}

pub struct DashboardService {
    reducers: ReducerSet,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(
        reducers: ReducerSet,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            reducers,
            store,
            clock,
            config,
        }
    }

    /// All five metrics, reduced concurrently over their own windows.
    #[instrument(skip(self, provider), fields(operation = "collect_metrics"))]
    pub async fn collect(&self, provider: &dyn ProviderClient) -> Result<MetricResults, AggregateError> {
        let now = self.clock.now();
        let r = &self.reducers;
        let fan_out = async {
            let (heart_rate, steps, sleep, oxygen, temperature) = tokio::join!(
                r.reduce(Metric::HeartRate, provider, now),
                r.reduce(Metric::Steps, provider, now),
                r.reduce(Metric::Sleep, provider, now),
                r.reduce(Metric::OxygenSaturation, provider, now),
                r.reduce(Metric::Temperature, provider, now),
            );
            MetricResults {
                heart_rate,
                steps,
                sleep,
                oxygen,
                temperature,
            }
        };
        tokio::time::timeout(self.config.timeout, fan_out)
            .await
            .map_err(|_| AggregateError::TimedOut(self.config.timeout))
    }

    /// Collect, aggregate and persist one snapshot for `email`.
    /// Nothing is written when aggregation fails.
    #[instrument(skip(self, provider), fields(operation = "build_dashboard"))]
    pub async fn build_dashboard(
        &self,
        email: &str,
        provider: &dyn ProviderClient,
    ) -> Result<StoredSnapshot, DashboardError> {
        let results = self.collect(provider).await?;
        let snapshot = aggregate(email, &results, self.config.policy).inspect_err(|e| {
            warn!(error = %e, "dashboard aggregation aborted");
        })?;
        let stored = self.store.save(&snapshot).await.inspect_err(|e| {
            warn!(error = %e, "snapshot save failed");
        })?;
        info!(
            snapshot_id = stored.id,
            populated_fields = stored.snapshot.populated_fields(),
            "dashboard snapshot saved"
        );
        Ok(stored)
    }

    pub fn reducers(&self) -> &ReducerSet {
        &self.reducers
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}
