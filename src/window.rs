// Time window resolution and the injectable clock.
// Provider calls want ms epochs, ns epochs ("{start}-{end}" dataset ids) or RFC 3339;
// TimeWindow carries an absolute interval and converts on demand.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// `None` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }

    /// Millisecond precision, scaled to nanoseconds.
    pub fn start_nanos(&self) -> i64 {
        self.start_millis().saturating_mul(NANOS_PER_MILLI)
    }

    pub fn end_nanos(&self) -> i64 {
        self.end_millis().saturating_mul(NANOS_PER_MILLI)
    }

    /// Dataset id for point queries: "{start_nanos}-{end_nanos}".
    pub fn dataset_id(&self) -> String {
        format!("{}-{}", self.start_nanos(), self.end_nanos())
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// Window ending at `now` and reaching `lookback` into the past.
/// Non-positive lookbacks are clamped to one millisecond so `start < end` holds;
/// lookbacks past the representable range start at the earliest instant.
pub fn resolve(now: DateTime<Utc>, lookback: Duration) -> TimeWindow {
    let lookback = lookback.max(Duration::milliseconds(1));
    let start = now
        .checked_sub_signed(lookback)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    TimeWindow { start, end: now }
}

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
