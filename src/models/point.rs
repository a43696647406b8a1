// Provider samples as the core sees them (after defensive parsing)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a point's typed value union. Anything the provider sends that
/// is neither a float nor an int becomes `Missing`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointValue {
    Float(f64),
    Int(i64),
    Missing,
}

impl PointValue {
    /// Numeric reading, if any. Non-finite floats are not readings.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            PointValue::Float(v) if v.is_finite() => Some(v),
            PointValue::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    /// Integer reading; floats are truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            PointValue::Int(v) => Some(v),
            PointValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPoint {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub values: Vec<PointValue>,
}

impl RawPoint {
    /// Point whose end time defaults to its start time.
    pub fn instant(at: DateTime<Utc>, values: Vec<PointValue>) -> Self {
        Self {
            start_time: at,
            end_time: at,
            values,
        }
    }

    pub fn span(start: DateTime<Utc>, end: DateTime<Utc>, values: Vec<PointValue>) -> Self {
        Self {
            start_time: start,
            end_time: end,
            values,
        }
    }

    /// The reducer-relevant value: the first entry of the value union.
    pub fn first_value(&self) -> PointValue {
        self.values.first().copied().unwrap_or(PointValue::Missing)
    }
}
