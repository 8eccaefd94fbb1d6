use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BillingStatus, Membership, MembershipStatus};

/// A membership period together with what has been paid against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MembershipView {
    pub membership: Membership,
    pub plan_name: Option<String>,
    pub status: MembershipStatus,
    pub total_paid_cents: i64,
    pub balance_due_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberSummary {
    pub member_id: Uuid,
    #[serde(flatten)]
    pub status: BillingStatus,
    pub active_plan_name: Option<String>,
    pub total_paid_all_time_cents: i64,
    /// Newest period first.
    pub membership_history: Vec<MembershipView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiringMembership {
    pub member_id: Uuid,
    pub member_name: String,
    pub membership_id: Uuid,
    pub end_date: NaiveDate,
    pub days_until_expiration: i64,
    pub balance_due_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutstandingBalance {
    pub member_id: Uuid,
    pub member_name: String,
    pub membership_id: Uuid,
    pub end_date: NaiveDate,
    pub balance_due_cents: i64,
    pub last_payment_date: Option<NaiveDate>,
    /// Days since the last payment, or since the period started if none.
    pub days_since_last_payment: i64,
    pub is_overdue: bool,
}
