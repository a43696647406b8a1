// Sleep stage classification and total sleep time.
// Stage table: 1 Awake, 2 Sleep, 3 OutOfBed, 4 LightSleep, 5 DeepSleep, 6 REMSleep.
// Only Sleep/Light/Deep/REM count toward the total. Provider order is kept and
// overlapping stages are summed as-is.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{MetricResult, PointValue, RawPoint, SleepDuration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SleepStageLabel {
    Awake,
    Sleep,
    OutOfBed,
    LightSleep,
    DeepSleep,
    #[serde(rename = "REMSleep")]
    RemSleep,
    Unknown,
}

impl SleepStageLabel {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SleepStageLabel::Awake,
            2 => SleepStageLabel::Sleep,
            3 => SleepStageLabel::OutOfBed,
            4 => SleepStageLabel::LightSleep,
            5 => SleepStageLabel::DeepSleep,
            6 => SleepStageLabel::RemSleep,
            _ => SleepStageLabel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepStageLabel::Awake => "Awake",
            SleepStageLabel::Sleep => "Sleep",
            SleepStageLabel::OutOfBed => "OutOfBed",
            SleepStageLabel::LightSleep => "LightSleep",
            SleepStageLabel::DeepSleep => "DeepSleep",
            SleepStageLabel::RemSleep => "REMSleep",
            SleepStageLabel::Unknown => "Unknown",
        }
    }

    pub fn counts_as_sleep(&self) -> bool {
        matches!(
            self,
            SleepStageLabel::Sleep
                | SleepStageLabel::LightSleep
                | SleepStageLabel::DeepSleep
                | SleepStageLabel::RemSleep
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepStage {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stage_code: i64,
    pub label: SleepStageLabel,
}

impl SleepStage {
    /// Whole minutes, floored; reversed spans count as zero.
    pub fn minutes(&self) -> u64 {
        (self.end - self.start).num_minutes().max(0) as u64
    }
}

/// One stage per point; stage code comes from the first value (0 if absent).
pub fn classify(points: &[RawPoint]) -> Vec<SleepStage> {
    points
        .iter()
        .map(|p| {
            let stage_code = p.first_value().as_i64().unwrap_or(0);
            SleepStage {
                start: p.start_time,
                end: p.end_time,
                stage_code,
                label: SleepStageLabel::from_code(stage_code),
            }
        })
        .collect()
}

/// Sleep sessions carry no stage detail; each one becomes a generic Sleep (2) segment.
pub fn sessions_as_segments(sessions: Vec<RawPoint>) -> Vec<RawPoint> {
    sessions
        .into_iter()
        .map(|s| RawPoint::span(s.start_time, s.end_time, vec![PointValue::Int(2)]))
        .collect()
}

pub fn total_sleep(stages: &[SleepStage]) -> SleepDuration {
    let minutes = stages
        .iter()
        .filter(|s| s.label.counts_as_sleep())
        .map(SleepStage::minutes)
        .sum();
    SleepDuration::from_minutes(minutes)
}

/// `Empty` when there are no points at all; otherwise the counted total
/// (which may be zero if every stage was awake / out of bed).
pub fn summarize_sleep(points: &[RawPoint]) -> MetricResult {
    if points.is_empty() {
        return MetricResult::Empty;
    }
    MetricResult::Duration(total_sleep(&classify(points)))
}
