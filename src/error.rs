// Error taxonomy: provider -> per-metric failure -> aggregation / persistence

use thiserror::Error;

use crate::models::Metric;

/// Talking to the time-series provider went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider rejected credentials (status {status})")]
    Unauthorized { status: u16 },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Why a reducer could not produce a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FailureReason {
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("no data")]
    NoData,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<ProviderError> for FailureReason {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Malformed(msg) => FailureReason::MalformedResponse(msg),
            ProviderError::Unavailable(msg) => FailureReason::ProviderUnavailable(msg),
            ProviderError::Unauthorized { status } => FailureReason::ProviderUnavailable(format!(
                "credentials rejected (status {})",
                status
            )),
        }
    }
}

/// A reducer failure, tagged with the metric it belongs to.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{metric}: {reason}")]
pub struct MetricFailure {
    pub metric: Metric,
    pub reason: FailureReason,
}

impl MetricFailure {
    pub fn new(metric: Metric, reason: impl Into<FailureReason>) -> Self {
        Self {
            metric,
            reason: reason.into(),
        }
    }

    pub fn no_data(metric: Metric) -> Self {
        Self::new(metric, FailureReason::NoData)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    /// First per-metric failure under the fail-fast policy.
    #[error(transparent)]
    Metric(#[from] MetricFailure),
    #[error("all metrics failed")]
    AllMetricsFailed(Vec<MetricFailure>),
    #[error("missing user identity")]
    MissingIdentity,
    #[error("aggregation timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

/// PersistenceFailure: the store write did not happen.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Persistence(e.to_string())
    }
}

/// Everything that can fail one dashboard request.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
