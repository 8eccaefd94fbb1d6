use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Payment, PaymentMethod},
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    membership_id: String,
    amount_cents: i64,
    payment_date: NaiveDate,
    method: String,
    screenshot_ref: Option<String>,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            membership_id: Uuid::parse_str(&row.membership_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            amount_cents: row.amount_cents,
            payment_date: row.payment_date,
            method: PaymentMethod::from_str(&row.method).ok_or_else(|| {
                AppError::Database(format!("Invalid payment method: {}", row.method))
            })?,
            screenshot_ref: row.screenshot_ref,
            notes: row.notes,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, membership_id, amount_cents, payment_date, method,
                   screenshot_ref, notes, created_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_payment).transpose()
    }
}

/// Insert `payment` unless the membership is missing or the payment would
/// push its total past the price snapshot. A single write statement takes
/// SQLite's write lock before it reads, so the sum it checks is the sum it
/// appends to. Returns whether a row was written.
pub(crate) async fn insert_within_price(
    conn: &mut SqliteConnection,
    payment: &Payment,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO payments (
            id, membership_id, amount_cents, payment_date, method,
            screenshot_ref, notes, created_at
        )
        SELECT ?, m.id, ?, ?, ?, ?, ?, ?
        FROM memberships m
        WHERE m.id = ?
          AND (
              SELECT COALESCE(SUM(p.amount_cents), 0)
              FROM payments p
              WHERE p.membership_id = m.id
          ) + ? <= m.price_snapshot_cents
        "#,
    )
    .bind(payment.id.to_string())
    .bind(payment.amount_cents)
    .bind(payment.payment_date)
    .bind(payment.method.as_str())
    .bind(&payment.screenshot_ref)
    .bind(&payment.notes)
    .bind(payment.created_at.naive_utc())
    .bind(payment.membership_id.to_string())
    .bind(payment.amount_cents)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn append_within_price(&self, payment: Payment) -> Result<Option<Payment>> {
        // Dropping `tx` before commit (e.g. a cancelled request) rolls it back.
        let mut tx = self.pool.begin().await?;

        if !insert_within_price(&mut *tx, &payment).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;

        self.find_by_id(payment.id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::Database("Failed to retrieve created payment".to_string()))
    }

    async fn find_by_membership(&self, membership_id: Uuid) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, membership_id, amount_cents, payment_date, method,
                   screenshot_ref, notes, created_at
            FROM payments
            WHERE membership_id = ?
            ORDER BY payment_date ASC, rowid ASC
            "#,
        )
        .bind(membership_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn find_by_member(&self, member_id: Uuid) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT p.id, p.membership_id, p.amount_cents, p.payment_date, p.method,
                   p.screenshot_ref, p.notes, p.created_at
            FROM payments p
            JOIN memberships m ON m.id = p.membership_id
            WHERE m.member_id = ?
            ORDER BY p.payment_date DESC, p.rowid DESC
            "#,
        )
        .bind(member_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn total_paid(&self, membership_id: Uuid) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM payments WHERE membership_id = ?",
        )
        .bind(membership_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }
}
