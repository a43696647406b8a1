// SnapshotRepo tests: connect, init, append, read back, append-only enforcement

mod common;

use chrono::Duration;
use common::t0;
use std::sync::Arc;
use tempfile::TempDir;
use vitals_dash::models::{DashboardSnapshot, SleepDuration};
use vitals_dash::snapshot_repo::{SnapshotRepo, SnapshotStore};
use vitals_dash::window::FixedClock;

fn snapshot(email: &str, steps: Option<i64>) -> DashboardSnapshot {
    DashboardSnapshot {
        user_email: email.into(),
        heart_rate_avg: Some(72.5),
        total_steps: steps,
        sleep_duration: Some(SleepDuration {
            hours: 6,
            minutes: 50,
        }),
        oxygen_avg: None,
        temperature: Some(36.6),
    }
}

async fn repo_at(dir: &TempDir, clock: FixedClock) -> SnapshotRepo {
    let path = dir.path().join("snapshots.db");
    let repo = SnapshotRepo::connect(path.to_str().unwrap(), 2, Arc::new(clock))
        .await
        .unwrap();
    repo.init().await.unwrap();
    repo
}

#[tokio::test]
async fn snapshot_repo_connect_and_init() {
    let dir = TempDir::new().unwrap();
    let repo = repo_at(&dir, FixedClock(t0())).await;
    // Second init is no-op (IF NOT EXISTS)
    repo.init().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn snapshot_repo_creates_parent_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("db").join("snapshots.db");
    let repo = SnapshotRepo::connect(path.to_str().unwrap(), 1, Arc::new(FixedClock(t0())))
        .await
        .unwrap();
    repo.init().await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn save_assigns_id_and_created_at() {
    let dir = TempDir::new().unwrap();
    let repo = repo_at(&dir, FixedClock(t0())).await;

    let stored = repo
        .save(&snapshot("ada@example.com", Some(4200)))
        .await
        .unwrap();
    assert!(stored.id > 0);
    assert_eq!(stored.created_at, t0());
    assert_eq!(stored.snapshot.total_steps, Some(4200));
}

#[tokio::test]
async fn save_and_read_back_with_nulls() {
    let dir = TempDir::new().unwrap();
    let repo = repo_at(&dir, FixedClock(t0())).await;

    repo.save(&snapshot("ada@example.com", None)).await.unwrap();
    let rows = repo.recent_for_user("ada@example.com", 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let s = &rows[0].snapshot;
    assert_eq!(s, &snapshot("ada@example.com", None));
    assert_eq!(rows[0].created_at, t0());
}

#[tokio::test]
async fn every_save_appends_a_row() {
    let dir = TempDir::new().unwrap();
    let repo = repo_at(&dir, FixedClock(t0())).await;

    let first = repo.save(&snapshot("ada@example.com", Some(1))).await.unwrap();
    let second = repo.save(&snapshot("ada@example.com", Some(2))).await.unwrap();
    repo.save(&snapshot("grace@example.com", Some(3))).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(repo.count().await.unwrap(), 3);
    let ada = repo.recent_for_user("ada@example.com", 10).await.unwrap();
    assert_eq!(ada.len(), 2);
    // Newest first
    assert_eq!(ada[0].snapshot.total_steps, Some(2));
    assert_eq!(ada[1].snapshot.total_steps, Some(1));
}

#[tokio::test]
async fn created_at_follows_the_store_clock() {
    let dir = TempDir::new().unwrap();
    let later = t0() + Duration::hours(5);
    let repo = repo_at(&dir, FixedClock(later)).await;
    let stored = repo.save(&snapshot("ada@example.com", None)).await.unwrap();
    assert_eq!(stored.created_at, later);
}

#[tokio::test]
async fn updates_are_rejected() {
    let dir = TempDir::new().unwrap();
    let repo = repo_at(&dir, FixedClock(t0())).await;
    let stored = repo.save(&snapshot("ada@example.com", Some(10))).await.unwrap();

    let res = sqlx::query("UPDATE dashboard_snapshots SET total_steps = 99 WHERE id = $1")
        .bind(stored.id)
        .execute(repo.pool())
        .await;
    let err = res.unwrap_err();
    assert!(err.to_string().contains("append-only"));

    let rows = repo.recent_for_user("ada@example.com", 1).await.unwrap();
    assert_eq!(rows[0].snapshot.total_steps, Some(10));
}

#[tokio::test]
async fn sleep_text_column_matches_dashboard_format() {
    let dir = TempDir::new().unwrap();
    let repo = repo_at(&dir, FixedClock(t0())).await;
    repo.save(&snapshot("ada@example.com", None)).await.unwrap();

    let text: String = sqlx::query_scalar("SELECT sleep_duration FROM dashboard_snapshots")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(text, "6 hr 50 min");
}
