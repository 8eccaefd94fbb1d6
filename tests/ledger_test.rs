mod common;

use common::{date, member, plan, setup, setup_shared};
use dues::{
    domain::{
        CreateMembershipRequest, LifecycleState, Membership, PaymentDetails, PaymentMethod,
        RecordPaymentRequest,
    },
    error::AppError,
    service::ServiceContext,
};
use chrono::NaiveDate;
use std::time::Duration;
use uuid::Uuid;

async fn unpaid_membership(ctx: &ServiceContext, price_cents: i64, start: NaiveDate) -> Membership {
    let plan = plan(ctx, "Monthly", price_cents, 30).await;
    let member = member(ctx, "Priya Sharma").await;
    ctx.membership_service
        .create_membership(CreateMembershipRequest {
            member_id: member.id,
            plan_id: plan.id,
            start_date: start,
            initial_payment: None,
            notes: None,
        })
        .await
        .unwrap()
}

fn payment(membership_id: Uuid, amount_cents: i64, payment_date: NaiveDate) -> RecordPaymentRequest {
    RecordPaymentRequest {
        membership_id,
        details: PaymentDetails {
            amount_cents,
            method: PaymentMethod::Cash,
            payment_date,
            screenshot_ref: None,
            notes: None,
        },
    }
}

#[tokio::test]
async fn test_full_payment_clears_balance() -> anyhow::Result<()> {
    let t = setup(date(2025, 1, 10)).await?;
    let membership = unpaid_membership(&t.ctx, 150_000, date(2025, 1, 1)).await;

    let recorded = t
        .ctx
        .ledger_service
        .add_payment(payment(membership.id, 150_000, date(2025, 1, 1)))
        .await?;

    assert_eq!(recorded.membership_id, membership.id);
    assert_eq!(t.ctx.ledger_service.total_paid(membership.id).await?, 150_000);
    assert_eq!(t.ctx.ledger_service.balance_due(membership.id).await?, 0);

    let status = t.ctx.membership_service.get_status(membership.member_id).await?;
    assert_eq!(status.state, LifecycleState::Active);
    assert_eq!(status.balance_due_cents, 0);
    assert_eq!(status.next_due_date, None);
    assert!(!status.is_overdue);

    Ok(())
}

#[tokio::test]
async fn test_overpayment_is_rejected_and_nothing_recorded() -> anyhow::Result<()> {
    let t = setup(date(2025, 1, 10)).await?;
    let membership = unpaid_membership(&t.ctx, 150_000, date(2025, 1, 1)).await;

    let err = t
        .ctx
        .ledger_service
        .add_payment(payment(membership.id, 160_000, date(2025, 1, 2)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::OverpaymentRejected {
            attempted_cents: 160_000,
            already_paid_cents: 0,
            price_cents: 150_000,
        }
    ));
    assert_eq!(
        err.to_string(),
        "Payment of 1600.00 exceeds remaining balance of 1500.00 (paid 0.00 of 1500.00)"
    );
    assert_eq!(t.ctx.ledger_service.total_paid(membership.id).await?, 0);
    assert!(t.ctx.ledger_service.list_payments(membership.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_non_positive_amounts_are_invalid() -> anyhow::Result<()> {
    let t = setup(date(2025, 1, 10)).await?;
    let membership = unpaid_membership(&t.ctx, 150_000, date(2025, 1, 1)).await;

    for amount in [0, -500] {
        let err = t
            .ctx
            .ledger_service
            .add_payment(payment(membership.id, amount, date(2025, 1, 2)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
    assert_eq!(t.ctx.ledger_service.total_paid(membership.id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_unknown_membership_is_not_found() -> anyhow::Result<()> {
    let t = setup(date(2025, 1, 10)).await?;
    let missing = Uuid::new_v4();

    let err = t
        .ctx
        .ledger_service
        .add_payment(payment(missing, 10_000, date(2025, 1, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(matches!(
        t.ctx.ledger_service.list_payments(missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        t.ctx.ledger_service.total_paid(missing).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_payments_listed_by_date_then_insertion() -> anyhow::Result<()> {
    let t = setup(date(2025, 1, 20)).await?;
    let membership = unpaid_membership(&t.ctx, 150_000, date(2025, 1, 1)).await;
    let ledger = &t.ctx.ledger_service;

    let late = ledger.add_payment(payment(membership.id, 30_000, date(2025, 1, 15))).await?;
    let same_day_first = ledger.add_payment(payment(membership.id, 20_000, date(2025, 1, 5))).await?;
    let same_day_second = ledger.add_payment(payment(membership.id, 10_000, date(2025, 1, 5))).await?;

    let ids: Vec<Uuid> = ledger
        .list_payments(membership.id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![same_day_first.id, same_day_second.id, late.id]);
    assert_eq!(ledger.total_paid(membership.id).await?, 60_000);

    Ok(())
}

#[tokio::test]
async fn test_partial_payments_never_exceed_price() -> anyhow::Result<()> {
    let t = setup(date(2025, 1, 20)).await?;
    let membership = unpaid_membership(&t.ctx, 100_000, date(2025, 1, 1)).await;
    let ledger = &t.ctx.ledger_service;

    let attempts = [40_000, 40_000, 40_000, 20_000, 1];
    let mut accepted = Vec::new();
    for amount in attempts {
        if ledger
            .add_payment(payment(membership.id, amount, date(2025, 1, 2)))
            .await
            .is_ok()
        {
            accepted.push(amount);
        }
        assert!(ledger.total_paid(membership.id).await? <= 100_000);
    }

    assert_eq!(accepted, vec![40_000, 40_000, 20_000]);
    assert_eq!(ledger.balance_due(membership.id).await?, 0);

    let err = ledger
        .add_payment(payment(membership.id, 1, date(2025, 1, 3)))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Payment of 0.01 exceeds remaining balance of 0.00 (paid 1000.00 of 1000.00)"
    );

    Ok(())
}

#[tokio::test]
async fn test_suggest_installments_splits_remaining_balance() -> anyhow::Result<()> {
    let t = setup(date(2025, 1, 10)).await?;
    let membership = unpaid_membership(&t.ctx, 100_000, date(2025, 1, 1)).await;
    let ledger = &t.ctx.ledger_service;

    assert_eq!(
        ledger.suggest_installments(membership.id, 3).await?,
        vec![33_333, 33_333, 33_334]
    );

    ledger.add_payment(payment(membership.id, 40_000, date(2025, 1, 2))).await?;
    assert_eq!(
        ledger.suggest_installments(membership.id, 4).await?,
        vec![15_000, 15_000, 15_000, 15_000]
    );

    assert!(matches!(
        ledger.suggest_installments(membership.id, 0).await,
        Err(AppError::InvalidArgument(_))
    ));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_cannot_overpay() -> anyhow::Result<()> {
    let t = setup_shared(date(2025, 1, 10)).await?;
    let membership = unpaid_membership(&t.ctx, 150_000, date(2025, 1, 1)).await;

    let first = {
        let ctx = t.ctx.clone();
        tokio::spawn(async move {
            ctx.ledger_service
                .add_payment(payment(membership.id, 80_000, date(2025, 1, 2)))
                .await
        })
    };
    let second = {
        let ctx = t.ctx.clone();
        tokio::spawn(async move {
            ctx.ledger_service
                .add_payment(payment(membership.id, 80_000, date(2025, 1, 2)))
                .await
        })
    };

    let results = [first.await?, second.await?];
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::OverpaymentRejected { .. })))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(rejected, 1);
    assert_eq!(t.ctx.ledger_service.total_paid(membership.id).await?, 80_000);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancelled_payments_do_not_poison_the_pool() -> anyhow::Result<()> {
    let t = setup_shared(date(2025, 1, 10)).await?;
    let membership = unpaid_membership(&t.ctx, 100_000_000, date(2025, 1, 1)).await;

    // Give up on most appends part-way through
    let mut cancelled = 0;
    for i in 0..400u64 {
        let attempt = t
            .ctx
            .ledger_service
            .add_payment(payment(membership.id, 100, date(2025, 1, 2)));
        if tokio::time::timeout(Duration::from_micros(50 + (i % 9) * 50), attempt)
            .await
            .is_err()
        {
            cancelled += 1;
        }
    }
    assert!(cancelled > 0);

    for _ in 0..20 {
        t.ctx
            .ledger_service
            .add_payment(payment(membership.id, 100, date(2025, 1, 3)))
            .await?;
    }

    let listed: i64 = t
        .ctx
        .ledger_service
        .list_payments(membership.id)
        .await?
        .iter()
        .map(|p| p.amount_cents)
        .sum();
    assert_eq!(t.ctx.ledger_service.total_paid(membership.id).await?, listed);

    Ok(())
}
