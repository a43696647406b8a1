// Point-level summaries for the scalar vitals. Pure: no provider, no windows.
// `Empty` means no usable reading; the reducer decides whether that is a failure.

use crate::models::{MetricResult, RawPoint};

/// Mean bpm over numeric readings.
pub fn mean_heart_rate(points: &[RawPoint]) -> MetricResult {
    mean(points.iter().filter_map(|p| p.first_value().as_f64()))
}

/// Sum of step deltas. Missing or non-numeric deltas count as 0, and an empty
/// window is a valid zero ("no movement").
pub fn total_steps(points: &[RawPoint]) -> MetricResult {
    let total: f64 = points
        .iter()
        .map(|p| p.first_value().as_f64().unwrap_or(0.0))
        .sum();
    MetricResult::Scalar(total)
}

/// Mean SpO2 over points that carry a reading; null readings are dropped.
pub fn mean_oxygen(points: &[RawPoint]) -> MetricResult {
    mean(points.iter().filter_map(|p| p.first_value().as_f64()))
}

fn mean(values: impl Iterator<Item = f64>) -> MetricResult {
    let (sum, n) = values.fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return MetricResult::Empty;
    }
    MetricResult::Scalar(sum / n as f64)
}
