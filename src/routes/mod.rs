// HTTP routes: thin boundary over the dashboard service

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::dashboard::DashboardService;
use crate::provider::ProviderFactory;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) service: Arc<DashboardService>,
    pub(crate) providers: Arc<dyn ProviderFactory>,
}

pub fn app(service: Arc<DashboardService>, providers: Arc<dyn ProviderFactory>) -> Router {
    let state = AppState { service, providers };
    Router::new()
        .route("/", get(|| async { "msg: at home" })) // GET /
        .route("/test", get(http::test_handler)) // GET /test
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/dashboard", get(http::dashboard_handler)) // GET /api/dashboard
        .route("/api/metrics/activity", get(http::activity_handler)) // GET /api/metrics/activity
        .route("/api/metrics/{metric}", get(http::metric_handler)) // GET /api/metrics/:metric
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
