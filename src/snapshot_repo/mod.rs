// SQLite snapshot store. Append-only: rows are inserted once per dashboard
// request; an UPDATE trigger rejects mutation. created_at is assigned here, at
// insert time, in ms since epoch.

mod schema;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;

use crate::error::StoreError;
use crate::models::{DashboardSnapshot, SleepDuration, StoredSnapshot};
use crate::window::Clock;

/// Write sink for finished snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, snapshot: &DashboardSnapshot) -> Result<StoredSnapshot, StoreError>;
}

pub struct SnapshotRepo {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SnapshotRepo {
    pub async fn connect(path: &str, max_pool_size: u32, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool, clock })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        schema::init_snapshot_table(&self.pool).await
    }

    /// Most recent snapshots for one user, newest first. Inspection only.
    #[instrument(skip(self), fields(repo = "snapshots", operation = "recent_for_user"))]
    pub async fn recent_for_user(
        &self,
        user_email: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<StoredSnapshot>> {
        let rows = sqlx::query(
            "SELECT id, user_email, heart_rate_avg, total_steps, sleep_minutes, oxygen_avg, temperature, created_at
             FROM dashboard_snapshots WHERE user_email = $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(user_email)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_row(&row)?);
        }
        Ok(out)
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM dashboard_snapshots")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    /// Raw pool access for maintenance tooling and tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn parse_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<StoredSnapshot> {
        let id: i64 = row.try_get("id")?;
        let user_email: String = row.try_get("user_email")?;
        let heart_rate_avg: Option<f64> = row.try_get("heart_rate_avg")?;
        let total_steps: Option<i64> = row.try_get("total_steps")?;
        let sleep_minutes: Option<i64> = row.try_get("sleep_minutes")?;
        let oxygen_avg: Option<f64> = row.try_get("oxygen_avg")?;
        let temperature: Option<f64> = row.try_get("temperature")?;
        let created_at: i64 = row.try_get("created_at")?;

        let created_at = DateTime::from_timestamp_millis(created_at)
            .ok_or_else(|| anyhow::anyhow!("created_at out of range: {}", created_at))?;

        Ok(StoredSnapshot {
            id,
            created_at,
            snapshot: DashboardSnapshot {
                user_email,
                heart_rate_avg,
                total_steps,
                sleep_duration: sleep_minutes.map(|m| SleepDuration::from_minutes(m.max(0) as u64)),
                oxygen_avg,
                temperature,
            },
        })
    }
}

#[async_trait]
impl SnapshotStore for SnapshotRepo {
    #[instrument(skip(self, snapshot), fields(repo = "snapshots", operation = "save"))]
    async fn save(&self, snapshot: &DashboardSnapshot) -> Result<StoredSnapshot, StoreError> {
        let created_at_ms = self.clock.now().timestamp_millis();
        let created_at: DateTime<Utc> = DateTime::from_timestamp_millis(created_at_ms)
            .ok_or_else(|| StoreError::Persistence("clock out of range".into()))?;

        let result = sqlx::query(
            "INSERT INTO dashboard_snapshots (user_email, heart_rate_avg, total_steps, sleep_duration, sleep_minutes, oxygen_avg, temperature, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&snapshot.user_email)
        .bind(snapshot.heart_rate_avg)
        .bind(snapshot.total_steps)
        .bind(snapshot.sleep_duration.map(|d| d.to_string()))
        .bind(snapshot.sleep_duration.map(|d| d.total_minutes() as i64))
        .bind(snapshot.oxygen_avg)
        .bind(snapshot.temperature)
        .bind(created_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(StoredSnapshot {
            id: result.last_insert_rowid(),
            created_at,
            snapshot: snapshot.clone(),
        })
    }
}
