use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use dues::{
    clock::SystemClock,
    config::StorageConfig,
    domain::{
        default_plans, CreateMemberRequest, CreateMembershipRequest, CreatePlanRequest,
        InitialPayment, PaymentDetails, PaymentMethod, RecordPaymentRequest,
    },
    service::ServiceContext,
    storage::LocalScreenshotStore,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Load the default plan catalog and, optionally, a few demo members.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    /// Database to seed
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://dues.db")]
    database_url: String,

    /// Also create demo members with memberships and payments
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let connect_options: SqliteConnectOptions = args.database_url.parse()?;
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options.create_if_missing(true))
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let ctx = ServiceContext::new(
        db_pool,
        Arc::new(SystemClock),
        Arc::new(LocalScreenshotStore::new(&StorageConfig::default())),
    );

    // Seed plans, skipping names already in the catalog
    println!("📦 Creating plans...");
    let existing = ctx.plan_service.list_plans(true).await?;
    let mut plans = Vec::new();
    for (name, price_cents, duration_days) in default_plans() {
        if let Some(plan) = existing.iter().find(|p| p.name == name) {
            plans.push(plan.clone());
            continue;
        }
        let plan = ctx
            .plan_service
            .create_plan(CreatePlanRequest {
                name: name.to_string(),
                price_cents,
                duration_days,
            })
            .await?;
        println!("  ✅ {} ({} days)", plan.name, plan.duration_days);
        plans.push(plan);
    }

    if !args.demo {
        println!("🎉 Done.");
        return Ok(());
    }

    println!("👥 Creating demo members...");
    let today = ctx.clock.today();
    let monthly = &plans[0];
    let quarterly = &plans[1];

    // Fully paid, active
    let asha = ctx
        .member_service
        .create_member(CreateMemberRequest {
            full_name: "Asha Rao".to_string(),
            email: Some("asha@example.com".to_string()),
            phone: None,
        })
        .await?;
    ctx.membership_service
        .create_membership(CreateMembershipRequest {
            member_id: asha.id,
            plan_id: quarterly.id,
            start_date: today - Duration::days(20),
            initial_payment: Some(InitialPayment {
                amount_cents: quarterly.price_cents,
                method: PaymentMethod::Upi,
                payment_date: Some(today - Duration::days(20)),
                screenshot_ref: None,
                notes: None,
            }),
            notes: None,
        })
        .await?;

    // Paying in installments, one still outstanding
    let ben = ctx
        .member_service
        .create_member(CreateMemberRequest {
            full_name: "Ben Okafor".to_string(),
            email: None,
            phone: Some("+91 98765 43210".to_string()),
        })
        .await?;
    let installment_membership = ctx
        .membership_service
        .create_membership(CreateMembershipRequest {
            member_id: ben.id,
            plan_id: quarterly.id,
            start_date: today - Duration::days(85),
            initial_payment: Some(InitialPayment {
                amount_cents: quarterly.price_cents / 2,
                method: PaymentMethod::Cash,
                payment_date: Some(today - Duration::days(85)),
                screenshot_ref: None,
                notes: Some("First half".to_string()),
            }),
            notes: None,
        })
        .await?;
    ctx.ledger_service
        .add_payment(RecordPaymentRequest {
            membership_id: installment_membership.id,
            details: PaymentDetails {
                amount_cents: quarterly.price_cents / 4,
                method: PaymentMethod::Card,
                payment_date: today - Duration::days(40),
                screenshot_ref: None,
                notes: None,
            },
        })
        .await?;

    // Lapsed with an unpaid balance
    let chen = ctx
        .member_service
        .create_member(CreateMemberRequest {
            full_name: "Chen Wei".to_string(),
            email: Some("chen@example.com".to_string()),
            phone: None,
        })
        .await?;
    ctx.membership_service
        .create_membership(CreateMembershipRequest {
            member_id: chen.id,
            plan_id: monthly.id,
            start_date: today - Duration::days(45),
            initial_payment: None,
            notes: Some("Walk-in".to_string()),
        })
        .await?;

    println!("  ✅ Created 3 demo members");
    println!("🎉 Done.");

    Ok(())
}
