pub mod ledger_service;
pub mod member_service;
pub mod membership_service;
pub mod plan_service;
pub mod report_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::clock::Clock;
use crate::repository::*;
use crate::storage::ScreenshotStore;
use ledger_service::LedgerService;
use member_service::MemberService;
use membership_service::MembershipService;
use plan_service::PlanService;
use report_service::ReportService;

pub use ledger_service::MembershipBalance;

pub struct ServiceContext {
    pub plan_service: Arc<PlanService>,
    pub member_service: Arc<MemberService>,
    pub ledger_service: Arc<LedgerService>,
    pub membership_service: Arc<MembershipService>,
    pub report_service: Arc<ReportService>,
    pub screenshot_store: Arc<dyn ScreenshotStore>,
    pub clock: Arc<dyn Clock>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        clock: Arc<dyn Clock>,
        screenshot_store: Arc<dyn ScreenshotStore>,
    ) -> Self {
        // Create repositories
        let plan_repo: Arc<dyn PlanRepository> = Arc::new(SqlitePlanRepository::new(db_pool.clone()));
        let member_repo: Arc<dyn MemberRepository> = Arc::new(SqliteMemberRepository::new(db_pool.clone()));
        let membership_repo: Arc<dyn MembershipRepository> =
            Arc::new(SqliteMembershipRepository::new(db_pool.clone()));
        let payment_repo: Arc<dyn PaymentRepository> = Arc::new(SqlitePaymentRepository::new(db_pool.clone()));

        // Create services, leaf first
        let plan_service = Arc::new(PlanService::new(plan_repo.clone()));
        let member_service = Arc::new(MemberService::new(member_repo.clone()));
        let ledger_service = Arc::new(LedgerService::new(membership_repo.clone(), payment_repo));
        let membership_service = Arc::new(MembershipService::new(
            plan_repo.clone(),
            member_repo,
            membership_repo,
            ledger_service.clone(),
            clock.clone(),
        ));
        let report_service = Arc::new(ReportService::new(
            member_service.clone(),
            membership_service.clone(),
            ledger_service.clone(),
            plan_repo,
            clock.clone(),
        ));

        Self {
            plan_service,
            member_service,
            ledger_service,
            membership_service,
            report_service,
            screenshot_store,
            clock,
            db_pool,
        }
    }
}
