// dashboard_snapshots table, lookup index and the append-only trigger.
// sleep_duration keeps the dashboard text ("7 hr 45 min"); sleep_minutes is the exact value.

use sqlx::SqlitePool;

pub(super) async fn init_snapshot_table(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dashboard_snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_email TEXT NOT NULL,
            heart_rate_avg REAL,
            total_steps INTEGER,
            sleep_duration TEXT,
            sleep_minutes INTEGER,
            oxygen_avg REAL,
            temperature REAL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_snapshots_user_created_at ON dashboard_snapshots(user_email, created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS dashboard_snapshots_append_only
        BEFORE UPDATE ON dashboard_snapshots
        BEGIN
            SELECT RAISE(ABORT, 'dashboard_snapshots is append-only');
        END
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
