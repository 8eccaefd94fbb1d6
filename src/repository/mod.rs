use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod member_repository;
pub mod membership_repository;
pub mod payment_repository;
pub mod plan_repository;

pub use member_repository::SqliteMemberRepository;
pub use membership_repository::SqliteMembershipRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use plan_repository::SqlitePlanRepository;

#[derive(Debug)]
pub enum CreateOutcome {
    Created(Membership),
    /// The initial payment exceeded the price.
    PaymentRefused,
    /// Another membership now ends after the renewal basis.
    RenewalBasisMoved,
}

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn create(&self, request: CreatePlanRequest) -> Result<Plan>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>>;
    async fn list(&self, include_inactive: bool) -> Result<Vec<Plan>>;
    async fn update(&self, id: Uuid, request: UpdatePlanRequest) -> Result<Plan>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, request: CreateMemberRequest) -> Result<Member>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;
    async fn list(&self) -> Result<Vec<Member>>;
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert a membership and, optionally, its first payment in one
    /// transaction. With `renewal_basis`, the insert only happens while no
    /// other membership of the member ends after that date. Nothing is
    /// written unless the outcome is `Created`.
    async fn create(
        &self,
        membership: Membership,
        initial_payment: Option<Payment>,
        renewal_basis: Option<NaiveDate>,
    ) -> Result<CreateOutcome>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membership>>;
    /// Newest `start_date` first.
    async fn find_by_member(&self, member_id: Uuid) -> Result<Vec<Membership>>;
    async fn list_all(&self) -> Result<Vec<Membership>>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Append `payment` only if the membership's total stays within its
    /// price. The check and the insert are one atomic step; `None` means the
    /// payment was refused and nothing was written.
    async fn append_within_price(&self, payment: Payment) -> Result<Option<Payment>>;
    /// Oldest first, ties in insertion order.
    async fn find_by_membership(&self, membership_id: Uuid) -> Result<Vec<Payment>>;
    /// Every payment across a member's memberships, newest first.
    async fn find_by_member(&self, member_id: Uuid) -> Result<Vec<Payment>>;
    async fn total_paid(&self, membership_id: Uuid) -> Result<i64>;
}
