// Dashboard snapshot: the one record the core persists per dashboard request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SleepDuration;

/// Aggregated, sanitized metrics for one user. Built in memory by the
/// aggregator and handed to the store exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub user_email: String,
    pub heart_rate_avg: Option<f64>,
    pub total_steps: Option<i64>,
    pub sleep_duration: Option<SleepDuration>,
    pub oxygen_avg: Option<f64>,
    pub temperature: Option<f64>,
}

impl DashboardSnapshot {
    /// Null out every value that is not a usable reading. Idempotent.
    pub fn sanitized(self) -> Self {
        Self {
            user_email: self.user_email,
            heart_rate_avg: sanitize_number(self.heart_rate_avg),
            total_steps: self.total_steps,
            sleep_duration: self.sleep_duration,
            oxygen_avg: sanitize_number(self.oxygen_avg),
            temperature: sanitize_number(self.temperature),
        }
    }

    /// Number of metric fields carrying a value.
    pub fn populated_fields(&self) -> usize {
        [
            self.heart_rate_avg.is_some(),
            self.total_steps.is_some(),
            self.sleep_duration.is_some(),
            self.oxygen_avg.is_some(),
            self.temperature.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Populated fields that came from provider readings. Temperature is left
    /// out: it always has a value, possibly the fallback.
    pub fn measured_fields(&self) -> usize {
        [
            self.heart_rate_avg.is_some(),
            self.total_steps.is_some(),
            self.sleep_duration.is_some(),
            self.oxygen_avg.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// NaN / infinite / missing -> None; finite passes through unchanged.
pub fn sanitize_number(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Empty (or whitespace-only) / missing -> None; other strings pass through unchanged.
pub fn sanitize_text(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// A snapshot after the store accepted it. `created_at` is assigned once, at insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSnapshot {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
}

/// Wire form returned by GET /api/dashboard. Sleep is rendered as "X hr Y min".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub id: i64,
    pub email: String,
    pub heart_rate_avg: Option<f64>,
    pub total_steps: Option<i64>,
    pub sleep_duration: Option<String>,
    pub sleep_hours: Option<f64>,
    pub oxygen_avg: Option<f64>,
    pub temperature: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredSnapshot> for DashboardView {
    fn from(stored: StoredSnapshot) -> Self {
        let s = stored.snapshot;
        Self {
            id: stored.id,
            email: s.user_email,
            heart_rate_avg: s.heart_rate_avg,
            total_steps: s.total_steps,
            sleep_duration: s.sleep_duration.map(|d| d.to_string()),
            sleep_hours: s.sleep_duration.map(|d| d.as_hours_f64()),
            oxygen_avg: s.oxygen_avg,
            temperature: s.temperature,
            created_at: stored.created_at,
        }
    }
}
