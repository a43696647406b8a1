// Reducer outputs: metric identity, sleep duration and the MetricResult union

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MetricFailure;

/// The five dashboard metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    HeartRate,
    Steps,
    Sleep,
    OxygenSaturation,
    Temperature,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::HeartRate,
        Metric::Steps,
        Metric::Sleep,
        Metric::OxygenSaturation,
        Metric::Temperature,
    ];

    /// Parse from the URL slug used by the per-metric endpoints.
    pub fn from_slug(s: &str) -> Option<Self> {
        match s {
            "heart-rate" => Some(Metric::HeartRate),
            "steps" => Some(Metric::Steps),
            "sleep" => Some(Metric::Sleep),
            "oxygen-saturation" => Some(Metric::OxygenSaturation),
            "body-temperature" | "temperature" => Some(Metric::Temperature),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::HeartRate => "HeartRate",
            Metric::Steps => "Steps",
            Metric::Sleep => "Sleep",
            Metric::OxygenSaturation => "OxygenSaturation",
            Metric::Temperature => "Temperature",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Total sleep time, normalized so `minutes < 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SleepDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl SleepDuration {
    pub fn from_minutes(total: u64) -> Self {
        Self {
            hours: (total / 60) as u32,
            minutes: (total % 60) as u32,
        }
    }

    pub fn total_minutes(&self) -> u64 {
        self.hours as u64 * 60 + self.minutes as u64
    }

    /// Fractional hours, for boundaries that want a single number.
    pub fn as_hours_f64(&self) -> f64 {
        self.total_minutes() as f64 / 60.0
    }
}

/// Dashboard text form, e.g. "7 hr 45 min".
impl fmt::Display for SleepDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hr {} min", self.hours, self.minutes)
    }
}

/// What one reducer produced for its window.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricResult {
    Scalar(f64),
    Duration(SleepDuration),
    /// Provider answered but nothing usable was in the window.
    Empty,
    Failure(MetricFailure),
}

impl MetricResult {
    pub fn scalar(&self) -> Option<f64> {
        match self {
            MetricResult::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn duration(&self) -> Option<SleepDuration> {
        match self {
            MetricResult::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&MetricFailure> {
        match self {
            MetricResult::Failure(f) => Some(f),
            _ => None,
        }
    }
}
