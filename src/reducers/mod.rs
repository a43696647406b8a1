// Metric reducers: one provider query per metric over its own window, collapsed
// into a single MetricResult. Provider errors never escape untagged: every
// failure is wrapped with the reducer's metric.

pub mod activity;
pub mod sleep;
pub mod temperature;
pub mod vitals;

use chrono::{DateTime, Duration, Utc};
use tracing::{instrument, warn};

use crate::config::{AppConfig, SleepSource};
use crate::error::{MetricFailure, ProviderError};
use crate::models::{Metric, MetricResult, RawPoint};
use crate::provider::ProviderClient;
use crate::window::{TimeWindow, resolve};
use activity::ActivitySummary;
use temperature::TemperatureReducer;

/// Provider data source and lookback for one metric.
#[derive(Debug, Clone)]
pub struct MetricSource {
    pub source_id: String,
    pub lookback: Duration,
}

impl MetricSource {
    pub fn new(source_id: impl Into<String>, lookback: Duration) -> Self {
        Self {
            source_id: source_id.into(),
            lookback,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SleepQuery {
    Segments,
    Sessions { activity_type: i64 },
}

/// The five reducers with their sources and windows.
pub struct ReducerSet {
    pub heart_rate: MetricSource,
    pub steps: MetricSource,
    pub oxygen: MetricSource,
    pub temperature: MetricSource,
    pub sleep: MetricSource,
    pub activity: MetricSource,
    pub sleep_query: SleepQuery,
    pub temperature_reducer: TemperatureReducer,
}

impl ReducerSet {
    pub fn from_config(config: &AppConfig) -> Self {
        let p = &config.provider;
        let w = &config.windows;
        let hours = |h: u32| Duration::hours(h as i64);
        Self {
            heart_rate: MetricSource::new(&p.heart_rate_source, hours(w.heart_rate_hours)),
            steps: MetricSource::new(&p.steps_source, hours(w.steps_hours)),
            oxygen: MetricSource::new(&p.oxygen_source, hours(w.oxygen_hours)),
            temperature: MetricSource::new(&p.temperature_source, hours(w.temperature_hours)),
            sleep: MetricSource::new(&p.sleep_source, Duration::days(w.sleep_days as i64)),
            activity: MetricSource::new(&p.activity_source, hours(w.activity_hours)),
            sleep_query: match p.sleep_mode {
                SleepSource::Segments => SleepQuery::Segments,
                SleepSource::Sessions => SleepQuery::Sessions {
                    activity_type: p.sleep_activity_type,
                },
            },
            temperature_reducer: TemperatureReducer::from_config(&config.temperature),
        }
    }

    pub fn source(&self, metric: Metric) -> &MetricSource {
        match metric {
            Metric::HeartRate => &self.heart_rate,
            Metric::Steps => &self.steps,
            Metric::Sleep => &self.sleep,
            Metric::OxygenSaturation => &self.oxygen,
            Metric::Temperature => &self.temperature,
        }
    }

    /// Window for `metric` ending at `now`.
    pub fn window(&self, metric: Metric, now: DateTime<Utc>) -> TimeWindow {
        resolve(now, self.source(metric).lookback)
    }

    /// Resolve the metric's window and reduce it.
    pub async fn reduce(
        &self,
        metric: Metric,
        provider: &dyn ProviderClient,
        now: DateTime<Utc>,
    ) -> MetricResult {
        let window = self.window(metric, now);
        self.reduce_window(metric, provider, &window).await
    }

    #[instrument(skip(self, provider, window), fields(operation = "reduce", metric = %metric))]
    pub async fn reduce_window(
        &self,
        metric: Metric,
        provider: &dyn ProviderClient,
        window: &TimeWindow,
    ) -> MetricResult {
        let result = match metric {
            Metric::HeartRate => self.heart_rate(provider, window).await,
            Metric::Steps => self.steps(provider, window).await,
            Metric::Sleep => self.sleep(provider, window).await,
            Metric::OxygenSaturation => self.oxygen(provider, window).await,
            Metric::Temperature => self.temperature(provider, window).await,
        };
        if let MetricResult::Failure(ref f) = result {
            warn!(error = %f, "metric reduction failed");
        }
        result
    }

    pub async fn heart_rate(&self, provider: &dyn ProviderClient, window: &TimeWindow) -> MetricResult {
        match fetch(Metric::HeartRate, provider, &self.heart_rate, window).await {
            Ok(points) => required(Metric::HeartRate, vitals::mean_heart_rate(&points)),
            Err(f) => MetricResult::Failure(f),
        }
    }

    pub async fn steps(&self, provider: &dyn ProviderClient, window: &TimeWindow) -> MetricResult {
        match fetch(Metric::Steps, provider, &self.steps, window).await {
            Ok(points) => vitals::total_steps(&points),
            Err(f) => MetricResult::Failure(f),
        }
    }

    pub async fn oxygen(&self, provider: &dyn ProviderClient, window: &TimeWindow) -> MetricResult {
        match fetch(Metric::OxygenSaturation, provider, &self.oxygen, window).await {
            Ok(points) => required(Metric::OxygenSaturation, vitals::mean_oxygen(&points)),
            Err(f) => MetricResult::Failure(f),
        }
    }

    /// Provider errors fall back like an empty window.
    pub async fn temperature(&self, provider: &dyn ProviderClient, window: &TimeWindow) -> MetricResult {
        let points = match fetch(Metric::Temperature, provider, &self.temperature, window).await {
            Ok(points) => points,
            Err(f) => {
                warn!(error = %f, "temperature unavailable, using fallback");
                vec![]
            }
        };
        self.temperature_reducer.summarize(&points)
    }

    /// Activity segments in `window`. Outside the dashboard, so provider
    /// errors are returned as-is.
    #[instrument(skip(self, provider, window), fields(operation = "activity"))]
    pub async fn activity(
        &self,
        provider: &dyn ProviderClient,
        window: &TimeWindow,
    ) -> Result<ActivitySummary, ProviderError> {
        let points = provider
            .fetch_points(&self.activity.source_id, window)
            .await
            .inspect_err(|e| warn!(error = %e, "activity fetch failed"))?;
        Ok(activity::summarize_activity(&points))
    }

    pub fn activity_window(&self, now: DateTime<Utc>) -> TimeWindow {
        resolve(now, self.activity.lookback)
    }

    pub async fn sleep(&self, provider: &dyn ProviderClient, window: &TimeWindow) -> MetricResult {
        let points = match self.sleep_query {
            SleepQuery::Segments => fetch(Metric::Sleep, provider, &self.sleep, window).await,
            SleepQuery::Sessions { activity_type } => provider
                .fetch_sessions(window, activity_type)
                .await
                .map(sleep::sessions_as_segments)
                .map_err(|e| MetricFailure::new(Metric::Sleep, e)),
        };
        match points {
            Ok(points) => required(Metric::Sleep, sleep::summarize_sleep(&points)),
            Err(f) => MetricResult::Failure(f),
        }
    }
}

async fn fetch(
    metric: Metric,
    provider: &dyn ProviderClient,
    source: &MetricSource,
    window: &TimeWindow,
) -> Result<Vec<RawPoint>, MetricFailure> {
    provider
        .fetch_points(&source.source_id, window)
        .await
        .map_err(|e| MetricFailure::new(metric, e))
}

/// `Empty` is a failure for metrics that need at least one reading.
fn required(metric: Metric, result: MetricResult) -> MetricResult {
    match result {
        MetricResult::Empty => MetricResult::Failure(MetricFailure::no_data(metric)),
        other => other,
    }
}
