use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::billing;
use crate::domain::{PaymentMethod, Plan};
use crate::error::Result;

/// One subscription period for one member, with the plan's price and
/// duration frozen at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub id: Uuid,
    pub member_id: Uuid,
    pub plan_id: Uuid,
    pub price_snapshot_cents: i64,
    pub duration_days_snapshot: i64,
    pub start_date: NaiveDate,
    /// Always `start_date + duration_days_snapshot`.
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Start a new period for `member_id` on `plan`, snapshotting its terms.
    pub fn purchase(
        member_id: Uuid,
        plan: &Plan,
        start_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self> {
        Self::from_snapshot(
            Uuid::new_v4(),
            member_id,
            plan.id,
            plan.price_cents,
            plan.duration_days,
            start_date,
            notes,
            Utc::now(),
        )
    }

    /// Rebuild a stored period. The end date is derived, never read back.
    #[allow(clippy::too_many_arguments)]
    pub fn from_snapshot(
        id: Uuid,
        member_id: Uuid,
        plan_id: Uuid,
        price_snapshot_cents: i64,
        duration_days_snapshot: i64,
        start_date: NaiveDate,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let end_date = billing::compute_end_date(start_date, duration_days_snapshot)?;
        Ok(Self {
            id,
            member_id,
            plan_id,
            price_snapshot_cents,
            duration_days_snapshot,
            start_date,
            end_date,
            notes,
            created_at,
        })
    }

    pub fn status_on(&self, today: NaiveDate) -> MembershipStatus {
        billing::status_on(self.end_date, today)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MembershipStatus {
    Active,
    Expired,
}

/// Where a member stands overall. `NoMembership` means no period was ever bought.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LifecycleState {
    NoMembership,
    Active,
    Expired,
}

impl From<MembershipStatus> for LifecycleState {
    fn from(status: MembershipStatus) -> Self {
        match status {
            MembershipStatus::Active => LifecycleState::Active,
            MembershipStatus::Expired => LifecycleState::Expired,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingStatus {
    pub state: LifecycleState,
    pub membership_id: Option<Uuid>,
    pub balance_due_cents: i64,
    pub next_due_date: Option<NaiveDate>,
    pub is_overdue: bool,
}

impl BillingStatus {
    pub fn no_membership() -> Self {
        Self {
            state: LifecycleState::NoMembership,
            membership_id: None,
            balance_due_cents: 0,
            next_due_date: None,
            is_overdue: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialPayment {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    /// Defaults to the membership's purchase day.
    pub payment_date: Option<NaiveDate>,
    pub screenshot_ref: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembershipRequest {
    pub member_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub initial_payment: Option<InitialPayment>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewMembershipRequest {
    pub plan_id: Uuid,
    /// Zero renews without recording a payment.
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub screenshot_ref: Option<String>,
    pub notes: Option<String>,
}
