// Shared test helpers: fake provider, counting store, point builders
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vitals_dash::config::{AppConfig, ProviderConfig};
use vitals_dash::error::{ProviderError, StoreError};
use vitals_dash::models::{DashboardSnapshot, PointValue, RawPoint, StoredSnapshot};
use vitals_dash::provider::{Credentials, ProviderClient, ProviderFactory};
use vitals_dash::window::TimeWindow;

pub const TEST_CONFIG: &str = r#"
[server]
port = 3000
host = "127.0.0.1"

[database]
path = "data/test.db"
max_pool_size = 2

[temperature]
fallback = "fixed"
fixed_value = 36.6
"#;

pub fn test_config() -> AppConfig {
    AppConfig::load_from_str(TEST_CONFIG).unwrap()
}

pub fn sources() -> ProviderConfig {
    ProviderConfig::default()
}

/// 2026-03-01T08:00:00Z
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
}

pub fn float_point(at: DateTime<Utc>, v: f64) -> RawPoint {
    RawPoint::instant(at, vec![PointValue::Float(v)])
}

pub fn int_point(at: DateTime<Utc>, v: i64) -> RawPoint {
    RawPoint::instant(at, vec![PointValue::Int(v)])
}

pub fn missing_point(at: DateTime<Utc>) -> RawPoint {
    RawPoint::instant(at, vec![PointValue::Missing])
}

pub fn stage(start: DateTime<Utc>, minutes: i64, code: i64) -> RawPoint {
    RawPoint::span(
        start,
        start + Duration::minutes(minutes),
        vec![PointValue::Int(code)],
    )
}

/// Provider answering from canned per-source responses. Unknown sources return no points.
#[derive(Default)]
pub struct FakeProvider {
    points: HashMap<String, Result<Vec<RawPoint>, ProviderError>>,
    sessions: Option<Result<Vec<RawPoint>, ProviderError>>,
    delay: Option<std::time::Duration>,
    pub calls: AtomicUsize,
    pub windows: Mutex<Vec<(String, TimeWindow)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points(mut self, source: &str, points: Vec<RawPoint>) -> Self {
        self.points.insert(source.to_string(), Ok(points));
        self
    }

    pub fn with_error(mut self, source: &str, err: ProviderError) -> Self {
        self.points.insert(source.to_string(), Err(err));
        self
    }

    pub fn with_sessions(mut self, sessions: Result<Vec<RawPoint>, ProviderError>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All five sources populated with plausible data.
    pub fn healthy() -> Self {
        let s = sources();
        let now = t0();
        Self::new()
            .with_points(
                &s.heart_rate_source,
                vec![
                    float_point(now - Duration::hours(2), 60.0),
                    float_point(now - Duration::hours(1), 80.0),
                ],
            )
            .with_points(
                &s.steps_source,
                vec![
                    int_point(now - Duration::hours(3), 1200),
                    int_point(now - Duration::hours(2), 800),
                ],
            )
            .with_points(
                &s.oxygen_source,
                vec![
                    float_point(now - Duration::hours(2), 97.0),
                    float_point(now - Duration::hours(1), 99.0),
                ],
            )
            .with_points(
                &s.temperature_source,
                vec![float_point(now - Duration::hours(1), 36.9)],
            )
            .with_points(
                &s.sleep_source,
                vec![
                    stage(now - Duration::hours(9), 120, 4),
                    stage(now - Duration::hours(7), 90, 5),
                    stage(now - Duration::minutes(330), 15, 1),
                ],
            )
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn window_for(&self, source: &str) -> Option<TimeWindow> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, w)| *w)
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    async fn fetch_points(
        &self,
        source_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RawPoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows
            .lock()
            .unwrap()
            .push((source_id.to_string(), *window));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.points
            .get(source_id)
            .cloned()
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn fetch_sessions(
        &self,
        window: &TimeWindow,
        _activity_type: i64,
    ) -> Result<Vec<RawPoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows
            .lock()
            .unwrap()
            .push(("sessions".to_string(), *window));
        self.sessions.clone().unwrap_or_else(|| Ok(vec![]))
    }
}

/// Hands out the same fake provider for every request and records the credentials it saw.
pub struct FakeFactory {
    pub provider: Arc<FakeProvider>,
    pub seen: Mutex<Vec<Credentials>>,
}

impl FakeFactory {
    pub fn new(provider: FakeProvider) -> Self {
        Self {
            provider: Arc::new(provider),
            seen: Mutex::new(vec![]),
        }
    }
}

impl ProviderFactory for FakeFactory {
    fn client(&self, credentials: Credentials) -> Arc<dyn ProviderClient> {
        self.seen.lock().unwrap().push(credentials);
        self.provider.clone()
    }
}

/// In-memory store counting save calls; can be told to fail.
#[derive(Default)]
pub struct CountingStore {
    pub saves: AtomicUsize,
    pub saved: Mutex<Vec<DashboardSnapshot>>,
    pub fail: bool,
}

impl CountingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl vitals_dash::snapshot_repo::SnapshotStore for CountingStore {
    async fn save(&self, snapshot: &DashboardSnapshot) -> Result<StoredSnapshot, StoreError> {
        let n = self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Persistence("disk full".into()));
        }
        self.saved.lock().unwrap().push(snapshot.clone());
        Ok(StoredSnapshot {
            id: n as i64 + 1,
            created_at: t0(),
            snapshot: snapshot.clone(),
        })
    }
}
