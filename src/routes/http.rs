// GET handlers: health, version, dashboard, per-metric

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::AppState;
use crate::error::{AggregateError, DashboardError};
use crate::models::{DashboardView, Metric, MetricResult};
use crate::reducers::activity::ActivitySegment;
use crate::provider::Credentials;

const USER_EMAIL_HEADER: &str = "x-user-email";

/// Error body: `{"error": "..."}` with a matching status.
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        let status = match &e {
            DashboardError::Aggregate(AggregateError::TimedOut(_)) => StatusCode::GATEWAY_TIMEOUT,
            DashboardError::Aggregate(AggregateError::MissingIdentity) => StatusCode::BAD_REQUEST,
            DashboardError::Aggregate(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, e.to_string())
    }
}

/// Bearer token from the Authorization header.
fn credentials(headers: &HeaderMap) -> Result<Credentials, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Credentials::bearer)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "User not authenticated"))
}

/// GET /test: liveness probe.
pub(super) async fn test_handler() -> impl IntoResponse {
    tracing::debug!("alive");
    Json(serde_json::json!({ "status": 200, "msg": "we are up!!" }))
}

/// GET /version: package name and version baked in at compile time.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/dashboard: aggregate all metrics for the caller and persist one snapshot.
pub(super) async fn dashboard_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardView>, ApiError> {
    let credentials = credentials(&headers)?;
    let email = headers
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::from(DashboardError::from(AggregateError::MissingIdentity)))?
        .to_string();
    let provider = state.providers.client(credentials);
    let stored = state
        .service
        .build_dashboard(&email, provider.as_ref())
        .await?;
    Ok(Json(DashboardView::from(stored)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MetricView {
    metric: Metric,
    window_start: String,
    window_end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sleep_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// GET /api/metrics/{metric}: one reduced metric; failures are reported, not persisted.
pub(super) async fn metric_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let metric = Metric::from_slug(&slug)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("unknown metric: {}", slug)))?;
    let credentials = credentials(&headers)?;
    let provider = state.providers.client(credentials);

    let window = state.service.reducers().window(metric, state.service.now());
    let result = state
        .service
        .reducers()
        .reduce_window(metric, provider.as_ref(), &window)
        .await;

    let mut view = MetricView {
        metric,
        window_start: window.start_rfc3339(),
        window_end: window.end_rfc3339(),
        value: None,
        sleep_duration: None,
        sleep_hours: None,
        error: None,
    };
    let status = match result {
        MetricResult::Scalar(v) => {
            view.value = Some(v);
            StatusCode::OK
        }
        MetricResult::Duration(d) => {
            view.sleep_duration = Some(d.to_string());
            view.sleep_hours = Some(d.as_hours_f64());
            StatusCode::OK
        }
        MetricResult::Empty => StatusCode::OK,
        MetricResult::Failure(f) => {
            view.error = Some(f.to_string());
            StatusCode::BAD_GATEWAY
        }
    };
    Ok((status, Json(view)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActivityView {
    window_start: String,
    window_end: String,
    total_minutes: u64,
    segments: Vec<ActivitySegment>,
}

/// GET /api/metrics/activity: activity segments over the activity window. Never persisted.
pub(super) async fn activity_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ActivityView>, ApiError> {
    let credentials = credentials(&headers)?;
    let provider = state.providers.client(credentials);
    let reducers = state.service.reducers();
    let window = reducers.activity_window(state.service.now());
    let summary = reducers
        .activity(provider.as_ref(), &window)
        .await
        .map_err(|e| ApiError::new(StatusCode::BAD_GATEWAY, format!("Activity: {}", e)))?;
    Ok(Json(ActivityView {
        window_start: window.start_rfc3339(),
        window_end: window.end_rfc3339(),
        total_minutes: summary.total_minutes,
        segments: summary.segments,
    }))
}
