use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Membership, Payment},
    error::{AppError, Result},
    repository::{payment_repository::insert_within_price, CreateOutcome, MembershipRepository},
};

#[derive(FromRow)]
struct MembershipRow {
    id: String,
    member_id: String,
    plan_id: String,
    price_snapshot_cents: i64,
    duration_days_snapshot: i64,
    start_date: NaiveDate,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteMembershipRepository {
    pool: SqlitePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_membership(row: MembershipRow) -> Result<Membership> {
        let parse = |s: &str| Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()));

        Membership::from_snapshot(
            parse(&row.id)?,
            parse(&row.member_id)?,
            parse(&row.plan_id)?,
            row.price_snapshot_cents,
            row.duration_days_snapshot,
            row.start_date,
            row.notes,
            DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        )
    }
}

#[async_trait]
impl MembershipRepository for SqliteMembershipRepository {
    async fn create(
        &self,
        membership: Membership,
        initial_payment: Option<Payment>,
        renewal_basis: Option<NaiveDate>,
    ) -> Result<CreateOutcome> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO memberships (
                id, member_id, plan_id, price_snapshot_cents,
                duration_days_snapshot, start_date, notes, created_at
            )
            SELECT ?, ?, ?, ?, ?, ?, ?, ?
            WHERE ? IS NULL OR NOT EXISTS (
                SELECT 1
                FROM memberships
                WHERE member_id = ?
                  AND date(start_date, '+' || duration_days_snapshot || ' days') > ?
            )
            "#,
        )
        .bind(membership.id.to_string())
        .bind(membership.member_id.to_string())
        .bind(membership.plan_id.to_string())
        .bind(membership.price_snapshot_cents)
        .bind(membership.duration_days_snapshot)
        .bind(membership.start_date)
        .bind(&membership.notes)
        .bind(membership.created_at.naive_utc())
        .bind(renewal_basis)
        .bind(membership.member_id.to_string())
        .bind(renewal_basis)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(CreateOutcome::RenewalBasisMoved);
        }

        if let Some(payment) = initial_payment {
            if !insert_within_price(&mut *tx, &payment).await? {
                tx.rollback().await?;
                return Ok(CreateOutcome::PaymentRefused);
            }
        }

        tx.commit().await?;

        self.find_by_id(membership.id)
            .await?
            .map(CreateOutcome::Created)
            .ok_or_else(|| AppError::Database("Failed to retrieve created membership".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membership>> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, member_id, plan_id, price_snapshot_cents,
                   duration_days_snapshot, start_date, notes, created_at
            FROM memberships
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_membership).transpose()
    }

    async fn find_by_member(&self, member_id: Uuid) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, member_id, plan_id, price_snapshot_cents,
                   duration_days_snapshot, start_date, notes, created_at
            FROM memberships
            WHERE member_id = ?
            ORDER BY start_date DESC, rowid DESC
            "#,
        )
        .bind(member_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_membership).collect()
    }

    async fn list_all(&self) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, member_id, plan_id, price_snapshot_cents,
                   duration_days_snapshot, start_date, notes, created_at
            FROM memberships
            ORDER BY start_date DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_membership).collect()
    }
}
