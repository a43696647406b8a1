use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use vitals_dash::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let clock: Arc<dyn window::Clock> = Arc::new(window::SystemClock);

    let snapshot_repo = Arc::new(
        snapshot_repo::SnapshotRepo::connect(
            &app_config.database.path,
            app_config.database.max_pool_size,
            clock.clone(),
        )
        .await?,
    );
    snapshot_repo.init().await?;

    let providers = Arc::new(provider::GoogleFitFactory::new(
        app_config.provider.base_url.clone(),
        Duration::from_secs(app_config.provider.request_timeout_secs),
    )?);

    let service = Arc::new(dashboard::DashboardService::new(
        reducers::ReducerSet::from_config(&app_config),
        snapshot_repo,
        clock,
        dashboard::DashboardConfig::from_app_config(&app_config),
    ));

    let app = routes::app(service, providers);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        policy = ?app_config.aggregation.policy,
        sleep_mode = ?app_config.provider.sleep_mode,
        "Listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(
                    tokio::signal::unix::SignalKind::terminate(),
                ) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    Ok(())
}
