use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreatePlanRequest, Plan, UpdatePlanRequest},
    error::{AppError, Result},
    repository::PlanRepository,
};

#[derive(FromRow)]
struct PlanRow {
    id: String,
    name: String,
    price_cents: i64,
    duration_days: i64,
    active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePlanRepository {
    pool: SqlitePool,
}

impl SqlitePlanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_plan(row: PlanRow) -> Result<Plan> {
        Ok(Plan {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            price_cents: row.price_cents,
            duration_days: row.duration_days,
            active: row.active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl PlanRepository for SqlitePlanRepository {
    async fn create(&self, request: CreatePlanRequest) -> Result<Plan> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO plans (
                id, name, price_cents, duration_days, active,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(request.price_cents)
        .bind(request.duration_days)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created plan".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, price_cents, duration_days, active,
                   created_at, updated_at
            FROM plans
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_plan).transpose()
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Plan>> {
        let query = if include_inactive {
            r#"
            SELECT id, name, price_cents, duration_days, active,
                   created_at, updated_at
            FROM plans
            ORDER BY duration_days ASC, name ASC
            "#
        } else {
            r#"
            SELECT id, name, price_cents, duration_days, active,
                   created_at, updated_at
            FROM plans
            WHERE active = 1
            ORDER BY duration_days ASC, name ASC
            "#
        };

        let rows = sqlx::query_as::<_, PlanRow>(query)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_plan).collect()
    }

    async fn update(&self, id: Uuid, request: UpdatePlanRequest) -> Result<Plan> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", id)))?;

        let name = request.name.unwrap_or(existing.name);
        let price_cents = request.price_cents.unwrap_or(existing.price_cents);
        let duration_days = request.duration_days.unwrap_or(existing.duration_days);
        let active = request.active.unwrap_or(existing.active);

        sqlx::query(
            r#"
            UPDATE plans
            SET name = ?, price_cents = ?, duration_days = ?, active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(price_cents)
        .bind(duration_days)
        .bind(if active { 1i32 } else { 0i32 })
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated plan".to_string()))
    }
}
