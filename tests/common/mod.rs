//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use dues::{
    clock::ManualClock,
    config::StorageConfig,
    domain::{CreateMemberRequest, CreatePlanRequest, Member, Plan},
    service::ServiceContext,
    storage::LocalScreenshotStore,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub clock: Arc<ManualClock>,
    pub pool: SqlitePool,
    scratch_dir: PathBuf,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.scratch_dir).ok();
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory database on a single connection, clock pinned to `today`.
pub async fn setup(today: NaiveDate) -> anyhow::Result<TestContext> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    build(pool, today, scratch_dir()).await
}

/// File-backed database with several connections, for tests that need
/// writes to genuinely overlap.
pub async fn setup_shared(today: NaiveDate) -> anyhow::Result<TestContext> {
    let dir = scratch_dir();
    std::fs::create_dir_all(&dir)?;

    let options = SqliteConnectOptions::new()
        .filename(dir.join("dues.db"))
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    build(pool, today, dir).await
}

async fn build(pool: SqlitePool, today: NaiveDate, dir: PathBuf) -> anyhow::Result<TestContext> {
    sqlx::migrate!("./migrations").run(&pool).await?;

    let clock = Arc::new(ManualClock::new(today));
    let store = LocalScreenshotStore::new(&StorageConfig {
        uploads_dir: dir.join("uploads").to_string_lossy().into_owned(),
        max_file_size_bytes: 1024 * 1024,
    });
    let ctx = Arc::new(ServiceContext::new(pool.clone(), clock.clone(), Arc::new(store)));

    Ok(TestContext {
        ctx,
        clock,
        pool,
        scratch_dir: dir,
    })
}

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("dues-test-{}", Uuid::new_v4()))
}

pub async fn plan(ctx: &ServiceContext, name: &str, price_cents: i64, duration_days: i64) -> Plan {
    ctx.plan_service
        .create_plan(CreatePlanRequest {
            name: name.to_string(),
            price_cents,
            duration_days,
        })
        .await
        .unwrap()
}

pub async fn member(ctx: &ServiceContext, full_name: &str) -> Member {
    ctx.member_service
        .create_member(CreateMemberRequest {
            full_name: full_name.to_string(),
            email: None,
            phone: None,
        })
        .await
        .unwrap()
}
