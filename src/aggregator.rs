// Fan-in: five MetricResults -> one sanitized DashboardSnapshot, or a composite error.
// Pure; the dashboard service runs the reducers and persists the result.

use crate::config::FailurePolicy;
use crate::error::{AggregateError, MetricFailure};
use crate::models::{DashboardSnapshot, Metric, MetricResult, sanitize_text};

/// One result per metric, as joined after the reducer fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResults {
    pub heart_rate: MetricResult,
    pub steps: MetricResult,
    pub sleep: MetricResult,
    pub oxygen: MetricResult,
    pub temperature: MetricResult,
}

impl MetricResults {
    pub fn get(&self, metric: Metric) -> &MetricResult {
        match metric {
            Metric::HeartRate => &self.heart_rate,
            Metric::Steps => &self.steps,
            Metric::Sleep => &self.sleep,
            Metric::OxygenSaturation => &self.oxygen,
            Metric::Temperature => &self.temperature,
        }
    }

    /// Failures in metric order.
    pub fn failures(&self) -> Vec<MetricFailure> {
        Metric::ALL
            .iter()
            .filter_map(|m| self.get(*m).failure().cloned())
            .collect()
    }
}

pub fn aggregate(
    email: &str,
    results: &MetricResults,
    policy: FailurePolicy,
) -> Result<DashboardSnapshot, AggregateError> {
    let user_email =
        sanitize_text(Some(email.trim().to_string())).ok_or(AggregateError::MissingIdentity)?;

    if policy == FailurePolicy::FailFast {
        // Temperature degrades to its fallback instead of failing.
        let first = Metric::ALL
            .iter()
            .filter(|m| **m != Metric::Temperature)
            .find_map(|m| results.get(*m).failure());
        if let Some(f) = first {
            return Err(AggregateError::Metric(f.clone()));
        }
    }

    let snapshot = DashboardSnapshot {
        user_email,
        heart_rate_avg: results.heart_rate.scalar(),
        total_steps: results
            .steps
            .scalar()
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i64),
        sleep_duration: results.sleep.duration(),
        oxygen_avg: results.oxygen.scalar(),
        temperature: results.temperature.scalar(),
    }
    .sanitized();

    if policy == FailurePolicy::Partial && snapshot.measured_fields() == 0 {
        return Err(AggregateError::AllMetricsFailed(results.failures()));
    }
    Ok(snapshot)
}
