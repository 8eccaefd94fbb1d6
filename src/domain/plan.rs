use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog offering. Memberships copy `price_cents` and `duration_days`
/// when they are created, so edits here only affect future purchases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub duration_days: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub price_cents: i64,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_days: Option<i64>,
    pub active: Option<bool>,
}

/// Default plans to seed (name, price_cents, duration_days)
pub fn default_plans() -> Vec<(&'static str, i64, i64)> {
    vec![
        ("Monthly", 150_000, 30),
        ("Quarterly", 400_000, 90),
        ("Half-Yearly", 750_000, 180),
        ("Annual", 1_400_000, 365),
    ]
}
