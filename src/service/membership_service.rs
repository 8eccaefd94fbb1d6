use std::sync::Arc;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    clock::Clock,
    domain::{
        billing, BillingStatus, CreateMembershipRequest, InitialPayment, Membership,
        MembershipStatus, Payment, PaymentDetails, RenewMembershipRequest,
    },
    error::{AppError, Result},
    repository::{CreateOutcome, MemberRepository, MembershipRepository, PlanRepository},
    service::ledger_service::{validate_amount, LedgerService},
};

const RENEWAL_ATTEMPTS: usize = 5;

/// Purchase, renewal and status of membership periods.
///
/// A member's periods form a chain: renewing while a period is still active
/// starts the new one where the active one ends, renewing after a lapse
/// starts it today. Periods are never modified or deleted, and which one is
/// "current" is always worked out from the dates.
pub struct MembershipService {
    plans: Arc<dyn PlanRepository>,
    members: Arc<dyn MemberRepository>,
    memberships: Arc<dyn MembershipRepository>,
    ledger: Arc<LedgerService>,
    clock: Arc<dyn Clock>,
}

impl MembershipService {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        members: Arc<dyn MemberRepository>,
        memberships: Arc<dyn MembershipRepository>,
        ledger: Arc<LedgerService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            plans,
            members,
            memberships,
            ledger,
            clock,
        }
    }

    /// Buy a period on `plan_id` starting at `start_date`. With an initial
    /// payment, either both records are written or neither is.
    pub async fn create_membership(&self, request: CreateMembershipRequest) -> Result<Membership> {
        self.purchase(request, None).await?.ok_or_else(|| {
            AppError::Internal("Membership insert refused without a renewal basis".to_string())
        })
    }

    /// Start the member's next period. Extends from the end of the active
    /// period if there is one, otherwise starts today.
    pub async fn renew(&self, member_id: Uuid, request: RenewMembershipRequest) -> Result<Membership> {
        if request.amount_cents < 0 {
            return Err(AppError::InvalidArgument(format!(
                "Renewal amount cannot be negative, got {}",
                billing::format_amount(request.amount_cents)
            )));
        }

        for _ in 0..RENEWAL_ATTEMPTS {
            let basis_date = match self.get_active_membership(member_id).await? {
                Some(active) => active.end_date,
                None => self.clock.today(),
            };

            let initial_payment = (request.amount_cents > 0).then(|| InitialPayment {
                amount_cents: request.amount_cents,
                method: request.method,
                payment_date: None,
                screenshot_ref: request.screenshot_ref.clone(),
                notes: None,
            });

            tracing::debug!("Renewing member {} from {}", member_id, basis_date);

            let purchase = CreateMembershipRequest {
                member_id,
                plan_id: request.plan_id,
                start_date: basis_date,
                initial_payment,
                notes: request.notes.clone(),
            };
            if let Some(membership) = self.purchase(purchase, Some(basis_date)).await? {
                return Ok(membership);
            }

            tracing::debug!(
                "Renewal basis {} for member {} moved, re-reading memberships",
                basis_date,
                member_id
            );
        }

        Err(AppError::Conflict(format!(
            "Member {} was renewed concurrently; try again",
            member_id
        )))
    }

    /// The active period that runs longest, if any.
    pub async fn get_active_membership(&self, member_id: Uuid) -> Result<Option<Membership>> {
        let memberships = self.list_memberships(member_id).await?;
        Ok(latest_active(&memberships, self.clock.today()).cloned())
    }

    /// Billing standing of the member's current period: the active one, or
    /// the most recent one once everything has lapsed.
    pub async fn get_status(&self, member_id: Uuid) -> Result<BillingStatus> {
        let memberships = self.list_memberships(member_id).await?;
        let today = self.clock.today();

        let current = latest_active(&memberships, today)
            .or_else(|| memberships.iter().max_by_key(|m| m.end_date));

        match current {
            Some(membership) => self.status_of(membership).await,
            None => Ok(BillingStatus::no_membership()),
        }
    }

    /// All of a member's periods, newest first.
    pub async fn list_memberships(&self, member_id: Uuid) -> Result<Vec<Membership>> {
        self.ensure_member(member_id).await?;
        self.memberships.find_by_member(member_id).await
    }

    /// Every period on record, newest first.
    pub async fn list_all_memberships(&self) -> Result<Vec<Membership>> {
        self.memberships.list_all().await
    }

    pub async fn get_membership(&self, id: Uuid) -> Result<Membership> {
        self.memberships
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Membership {} not found", id)))
    }

    pub async fn status_of(&self, membership: &Membership) -> Result<BillingStatus> {
        let today = self.clock.today();
        let balance = self.ledger.balance_of(membership).await?;

        Ok(BillingStatus {
            state: membership.status_on(today).into(),
            membership_id: Some(membership.id),
            balance_due_cents: balance.balance_due_cents,
            next_due_date: billing::next_due_date(membership.end_date, balance.balance_due_cents),
            is_overdue: billing::is_overdue(membership.end_date, balance.balance_due_cents, today),
        })
    }

    /// Insert a period, guarded by `renewal_basis` when renewing. `None`
    /// means another period now ends after that basis.
    async fn purchase(
        &self,
        request: CreateMembershipRequest,
        renewal_basis: Option<NaiveDate>,
    ) -> Result<Option<Membership>> {
        self.ensure_member(request.member_id).await?;

        let plan = self
            .plans
            .find_by_id(request.plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", request.plan_id)))?;
        if !plan.active {
            return Err(AppError::PlanInactive(plan.name));
        }

        let membership =
            Membership::purchase(request.member_id, &plan, request.start_date, request.notes)?;

        let initial_payment = request
            .initial_payment
            .map(|initial| self.initial_payment(&membership, initial))
            .transpose()?;
        let initial_amount = initial_payment.as_ref().map(|p| p.amount_cents);

        match self
            .memberships
            .create(membership, initial_payment, renewal_basis)
            .await?
        {
            CreateOutcome::Created(membership) => {
                tracing::info!(
                    "Created membership {} for member {} on plan {} ({} to {})",
                    membership.id,
                    membership.member_id,
                    plan.name,
                    membership.start_date,
                    membership.end_date
                );
                Ok(Some(membership))
            }
            CreateOutcome::PaymentRefused => {
                let attempted = initial_amount.unwrap_or_default();
                tracing::warn!(
                    "Rejected initial payment of {} cents for member {} on plan {}",
                    attempted,
                    request.member_id,
                    plan.name
                );
                Err(AppError::overpayment(attempted, 0, plan.price_cents))
            }
            CreateOutcome::RenewalBasisMoved => Ok(None),
        }
    }

    fn initial_payment(&self, membership: &Membership, initial: InitialPayment) -> Result<Payment> {
        validate_amount(initial.amount_cents)?;
        if initial.amount_cents > membership.price_snapshot_cents {
            return Err(AppError::overpayment(
                initial.amount_cents,
                0,
                membership.price_snapshot_cents,
            ));
        }

        Ok(Payment::new(
            membership.id,
            PaymentDetails {
                amount_cents: initial.amount_cents,
                method: initial.method,
                payment_date: initial.payment_date.unwrap_or_else(|| self.clock.today()),
                screenshot_ref: initial.screenshot_ref,
                notes: initial.notes,
            },
        ))
    }

    async fn ensure_member(&self, member_id: Uuid) -> Result<()> {
        self.members
            .find_by_id(member_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))
    }
}

fn latest_active(memberships: &[Membership], today: NaiveDate) -> Option<&Membership> {
    memberships
        .iter()
        .filter(|m| m.status_on(today) == MembershipStatus::Active)
        .max_by_key(|m| m.end_date)
}
