// Domain models: provider points, reducer results, dashboard snapshots

mod metric;
mod point;
mod snapshot;

pub use metric::{Metric, MetricResult, SleepDuration};
pub use point::{PointValue, RawPoint};
pub use snapshot::{
    DashboardSnapshot, DashboardView, StoredSnapshot, sanitize_number, sanitize_text,
};
