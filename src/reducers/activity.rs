// Activity segments: passthrough of the provider's activity timeline.
// Not part of the dashboard snapshot; only served on its own endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::RawPoint;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub activity_type: i64,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub segments: Vec<ActivitySegment>,
    pub total_minutes: u64,
}

/// Segments in provider order. Points without an activity type are dropped.
pub fn summarize_activity(points: &[RawPoint]) -> ActivitySummary {
    let segments: Vec<ActivitySegment> = points
        .iter()
        .filter_map(|p| {
            let activity_type = p.first_value().as_i64()?;
            Some(ActivitySegment {
                start: p.start_time,
                end: p.end_time,
                activity_type,
                minutes: (p.end_time - p.start_time).num_minutes().max(0) as u64,
            })
        })
        .collect();
    let total_minutes = segments.iter().map(|s| s.minutes).sum();
    ActivitySummary {
        segments,
        total_minutes,
    }
}
