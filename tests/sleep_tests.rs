// Sleep stage classifier tests: label table, counted stages, order and overlap behaviour

mod common;

use chrono::Duration;
use common::{stage, t0};
use vitals_dash::models::{MetricResult, PointValue, RawPoint, SleepDuration};
use vitals_dash::reducers::sleep::{
    SleepStageLabel, classify, sessions_as_segments, summarize_sleep, total_sleep,
};

#[test]
fn classify_maps_stage_codes_to_labels() {
    let points: Vec<RawPoint> = (0..=7).map(|code| stage(t0(), 10, code)).collect();
    let labels: Vec<&str> = classify(&points).iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Unknown",
            "Awake",
            "Sleep",
            "OutOfBed",
            "LightSleep",
            "DeepSleep",
            "REMSleep",
            "Unknown"
        ]
    );
}

#[test]
fn deep_sleep_counts_and_awake_does_not() {
    // 30 min deep sleep, then 60 min awake
    let points = vec![
        stage(t0(), 30, 5),
        stage(t0() + Duration::minutes(30), 60, 1),
    ];
    assert_eq!(
        summarize_sleep(&points),
        MetricResult::Duration(SleepDuration {
            hours: 0,
            minutes: 30
        })
    );
}

#[test]
fn out_of_bed_and_unknown_codes_are_excluded() {
    let points = vec![
        stage(t0(), 45, 3),
        stage(t0(), 45, 9),
        stage(t0(), 45, 2),
    ];
    assert_eq!(total_sleep(&classify(&points)).total_minutes(), 45);
}

#[test]
fn all_counted_stages_sum_into_hours_and_minutes() {
    let points = vec![
        stage(t0(), 60, 2),
        stage(t0() + Duration::minutes(60), 120, 4),
        stage(t0() + Duration::minutes(180), 50, 5),
        stage(t0() + Duration::minutes(230), 35, 6),
    ];
    let total = total_sleep(&classify(&points));
    assert_eq!(total, SleepDuration { hours: 4, minutes: 25 });
    assert_eq!(total.to_string(), "4 hr 25 min");
    assert!((total.as_hours_f64() - 265.0 / 60.0).abs() < 1e-9);
}

#[test]
fn durations_are_floored_to_whole_minutes() {
    let p = RawPoint::span(
        t0(),
        t0() + Duration::seconds(59 * 60 + 59),
        vec![PointValue::Int(4)],
    );
    let stages = classify(&[p]);
    assert_eq!(stages[0].minutes(), 59);
}

#[test]
fn reversed_span_counts_as_zero() {
    let p = RawPoint::span(t0(), t0() - Duration::minutes(20), vec![PointValue::Int(5)]);
    assert_eq!(total_sleep(&classify(&[p])).total_minutes(), 0);
}

#[test]
fn total_is_order_invariant() {
    let forward = vec![
        stage(t0(), 40, 4),
        stage(t0() + Duration::minutes(40), 25, 1),
        stage(t0() + Duration::minutes(65), 70, 6),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();
    assert_eq!(
        total_sleep(&classify(&forward)),
        total_sleep(&classify(&reversed))
    );
}

#[test]
fn total_is_monotonic_in_counted_stages() {
    let mut points = vec![stage(t0(), 30, 1)];
    let mut last = total_sleep(&classify(&points));
    for (i, code) in [2, 4, 5, 6, 1, 3].into_iter().enumerate() {
        points.push(stage(t0() + Duration::minutes(30 * (i as i64 + 1)), 30, code));
        let next = total_sleep(&classify(&points));
        assert!(next >= last);
        last = next;
    }
    assert_eq!(last.total_minutes(), 120);
}

#[test]
fn overlapping_stages_are_summed_as_is() {
    let points = vec![stage(t0(), 60, 4), stage(t0(), 60, 5)];
    assert_eq!(total_sleep(&classify(&points)).total_minutes(), 120);
}

#[test]
fn classify_preserves_provider_order() {
    let points = vec![
        stage(t0() + Duration::hours(2), 10, 5),
        stage(t0(), 10, 4),
    ];
    let stages = classify(&points);
    assert_eq!(stages[0].label, SleepStageLabel::DeepSleep);
    assert_eq!(stages[1].label, SleepStageLabel::LightSleep);
}

#[test]
fn missing_or_float_stage_values() {
    let missing = RawPoint::span(t0(), t0() + Duration::minutes(10), vec![]);
    let float = RawPoint::span(
        t0(),
        t0() + Duration::minutes(10),
        vec![PointValue::Float(4.0)],
    );
    let stages = classify(&[missing, float]);
    assert_eq!(stages[0].label, SleepStageLabel::Unknown);
    assert_eq!(stages[1].label, SleepStageLabel::LightSleep);
}

#[test]
fn empty_points_summarize_to_empty() {
    assert_eq!(summarize_sleep(&[]), MetricResult::Empty);
}

#[test]
fn awake_only_night_is_zero_not_empty() {
    let points = vec![stage(t0(), 30, 1)];
    assert_eq!(
        summarize_sleep(&points),
        MetricResult::Duration(SleepDuration::from_minutes(0))
    );
}

#[test]
fn sessions_become_generic_sleep_segments() {
    let sessions = vec![RawPoint::span(
        t0(),
        t0() + Duration::hours(7),
        vec![PointValue::Int(72)],
    )];
    let segments = sessions_as_segments(sessions);
    assert_eq!(
        total_sleep(&classify(&segments)),
        SleepDuration { hours: 7, minutes: 0 }
    );
}
