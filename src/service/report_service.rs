use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    clock::Clock,
    domain::{
        billing, ExpiringMembership, LifecycleState, MemberSummary, MembershipView,
        OutstandingBalance, Payment,
    },
    error::{AppError, Result},
    repository::PlanRepository,
    service::{
        ledger_service::LedgerService, member_service::MemberService,
        membership_service::MembershipService,
    },
};

/// Read-only billing views for dashboards. Every figure comes from the
/// membership and ledger services; nothing is computed twice.
pub struct ReportService {
    members: Arc<MemberService>,
    memberships: Arc<MembershipService>,
    ledger: Arc<LedgerService>,
    plans: Arc<dyn PlanRepository>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(
        members: Arc<MemberService>,
        memberships: Arc<MembershipService>,
        ledger: Arc<LedgerService>,
        plans: Arc<dyn PlanRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            members,
            memberships,
            ledger,
            plans,
            clock,
        }
    }

    pub async fn member_summary(&self, member_id: Uuid) -> Result<MemberSummary> {
        let status = self.memberships.get_status(member_id).await?;
        let history = self.memberships.list_memberships(member_id).await?;
        let today = self.clock.today();

        let mut plan_names: HashMap<Uuid, Option<String>> = HashMap::new();
        let mut membership_history = Vec::with_capacity(history.len());

        for membership in history {
            let plan_name = match plan_names.get(&membership.plan_id).cloned() {
                Some(name) => name,
                None => {
                    let name = self
                        .plans
                        .find_by_id(membership.plan_id)
                        .await?
                        .map(|plan| plan.name);
                    plan_names.insert(membership.plan_id, name.clone());
                    name
                }
            };

            let balance = self.ledger.balance_of(&membership).await?;
            membership_history.push(MembershipView {
                status: membership.status_on(today),
                plan_name,
                total_paid_cents: balance.total_paid_cents,
                balance_due_cents: balance.balance_due_cents,
                membership,
            });
        }

        let total_paid_all_time_cents = membership_history
            .iter()
            .map(|view| view.total_paid_cents)
            .sum();

        let active_plan_name = match status.state {
            LifecycleState::Active => membership_history
                .iter()
                .find(|view| Some(view.membership.id) == status.membership_id)
                .and_then(|view| view.plan_name.clone()),
            _ => None,
        };

        Ok(MemberSummary {
            member_id,
            status,
            active_plan_name,
            total_paid_all_time_cents,
            membership_history,
        })
    }

    /// Payments across all of a member's periods, newest first.
    pub async fn member_payment_history(&self, member_id: Uuid) -> Result<Vec<Payment>> {
        self.members.get_member(member_id).await?;
        self.ledger.member_payments(member_id).await
    }

    /// Members whose active period ends within `within_days`, soonest first.
    pub async fn expiring_memberships(&self, within_days: i64) -> Result<Vec<ExpiringMembership>> {
        if within_days < 0 {
            return Err(AppError::InvalidArgument(format!(
                "Expiry window cannot be negative, got {}",
                within_days
            )));
        }

        let today = self.clock.today();
        let mut expiring = Vec::new();

        for member in self.members.list_members().await? {
            let Some(active) = self.memberships.get_active_membership(member.id).await? else {
                continue;
            };

            let days_until_expiration = (active.end_date - today).num_days();
            if days_until_expiration > within_days {
                continue;
            }

            let balance = self.ledger.balance_of(&active).await?;
            expiring.push(ExpiringMembership {
                member_id: member.id,
                member_name: member.full_name,
                membership_id: active.id,
                end_date: active.end_date,
                days_until_expiration,
                balance_due_cents: balance.balance_due_cents,
            });
        }

        expiring.sort_by_key(|e| (e.days_until_expiration, e.member_name.clone()));
        Ok(expiring)
    }

    /// Every period with money still owed, longest since last payment first.
    pub async fn outstanding_balances(&self) -> Result<Vec<OutstandingBalance>> {
        let today = self.clock.today();
        let names: HashMap<Uuid, String> = self
            .members
            .list_members()
            .await?
            .into_iter()
            .map(|member| (member.id, member.full_name))
            .collect();
        let mut outstanding = Vec::new();

        for membership in self.memberships.list_all_memberships().await? {
            let balance = self.ledger.balance_of(&membership).await?;
            if balance.balance_due_cents == 0 {
                continue;
            }

            let last_payment_date = self
                .ledger
                .list_payments(membership.id)
                .await?
                .last()
                .map(|payment| payment.payment_date);
            let since = last_payment_date.unwrap_or(membership.start_date);

            outstanding.push(OutstandingBalance {
                member_id: membership.member_id,
                member_name: names.get(&membership.member_id).cloned().unwrap_or_default(),
                membership_id: membership.id,
                end_date: membership.end_date,
                balance_due_cents: balance.balance_due_cents,
                last_payment_date,
                days_since_last_payment: (today - since).num_days(),
                is_overdue: billing::is_overdue(
                    membership.end_date,
                    balance.balance_due_cents,
                    today,
                ),
            });
        }

        outstanding.sort_by(|a, b| {
            b.days_since_last_payment
                .cmp(&a.days_since_last_payment)
                .then_with(|| a.member_name.cmp(&b.member_name))
        });
        Ok(outstanding)
    }
}
