use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{billing, Membership, Payment, RecordPaymentRequest},
    error::{AppError, Result},
    repository::{MembershipRepository, PaymentRepository},
};

/// What has been paid against one membership and what is still owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipBalance {
    pub total_paid_cents: i64,
    pub balance_due_cents: i64,
}

/// Append-only record of money received per membership. Every write goes
/// through the store's compare-and-append, so the total paid can never
/// exceed the price snapshot.
pub struct LedgerService {
    memberships: Arc<dyn MembershipRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl LedgerService {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self { memberships, payments }
    }

    pub async fn add_payment(&self, request: RecordPaymentRequest) -> Result<Payment> {
        validate_amount(request.details.amount_cents)?;
        let membership = self.membership(request.membership_id).await?;

        let amount_cents = request.details.amount_cents;
        let payment = Payment::new(membership.id, request.details);

        match self.payments.append_within_price(payment).await? {
            Some(payment) => {
                tracing::info!(
                    "Recorded payment {} of {} cents against membership {}",
                    payment.id,
                    payment.amount_cents,
                    membership.id
                );
                Ok(payment)
            }
            None => {
                let already_paid = self.payments.total_paid(membership.id).await?;
                tracing::warn!(
                    "Rejected payment of {} cents against membership {}: {} of {} already paid",
                    amount_cents,
                    membership.id,
                    already_paid,
                    membership.price_snapshot_cents
                );
                Err(AppError::overpayment(
                    amount_cents,
                    already_paid,
                    membership.price_snapshot_cents,
                ))
            }
        }
    }

    pub async fn list_payments(&self, membership_id: Uuid) -> Result<Vec<Payment>> {
        let membership = self.membership(membership_id).await?;
        self.payments.find_by_membership(membership.id).await
    }

    pub async fn total_paid(&self, membership_id: Uuid) -> Result<i64> {
        let membership = self.membership(membership_id).await?;
        self.payments.total_paid(membership.id).await
    }

    pub async fn balance_due(&self, membership_id: Uuid) -> Result<i64> {
        let membership = self.membership(membership_id).await?;
        Ok(self.balance_of(&membership).await?.balance_due_cents)
    }

    /// Split what is still owed on a membership into `count` installments.
    pub async fn suggest_installments(&self, membership_id: Uuid, count: u32) -> Result<Vec<i64>> {
        let balance_due = self.balance_due(membership_id).await?;
        billing::distribute_installments(balance_due, count)
    }

    pub async fn balance_of(&self, membership: &Membership) -> Result<MembershipBalance> {
        let total_paid_cents = self.payments.total_paid(membership.id).await?;
        Ok(MembershipBalance {
            total_paid_cents,
            balance_due_cents: billing::compute_balance(
                membership.price_snapshot_cents,
                &[total_paid_cents],
            ),
        })
    }

    /// Every payment a member has made, newest first.
    pub async fn member_payments(&self, member_id: Uuid) -> Result<Vec<Payment>> {
        self.payments.find_by_member(member_id).await
    }

    async fn membership(&self, id: Uuid) -> Result<Membership> {
        self.memberships
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Membership {} not found", id)))
    }
}

pub(crate) fn validate_amount(amount_cents: i64) -> Result<()> {
    if amount_cents <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "Payment amount must be positive, got {}",
            billing::format_amount(amount_cents)
        )));
    }
    Ok(())
}
