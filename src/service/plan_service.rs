use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{CreatePlanRequest, Plan, UpdatePlanRequest},
    error::{AppError, Result},
    repository::PlanRepository,
};

/// Administrator-facing maintenance of the plan catalog.
pub struct PlanService {
    repo: Arc<dyn PlanRepository>,
}

impl PlanService {
    pub fn new(repo: Arc<dyn PlanRepository>) -> Self {
        Self { repo }
    }

    /// Plans open for purchase, shortest first
    pub async fn list_active_plans(&self) -> Result<Vec<Plan>> {
        self.repo.list(false).await
    }

    pub async fn list_plans(&self, include_inactive: bool) -> Result<Vec<Plan>> {
        self.repo.list(include_inactive).await
    }

    pub async fn get_plan(&self, id: Uuid) -> Result<Plan> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", id)))
    }

    pub async fn create_plan(&self, mut request: CreatePlanRequest) -> Result<Plan> {
        request.name = request.name.trim().to_string();
        validate_terms(
            Some(&request.name),
            Some(request.price_cents),
            Some(request.duration_days),
        )?;

        let plan = self.repo.create(request).await?;
        tracing::info!(
            "Created plan {} ({}, {} cents / {} days)",
            plan.id,
            plan.name,
            plan.price_cents,
            plan.duration_days
        );
        Ok(plan)
    }

    /// Edit or retire a plan. Existing memberships keep their snapshot.
    pub async fn update_plan(&self, id: Uuid, mut request: UpdatePlanRequest) -> Result<Plan> {
        request.name = request.name.map(|name| name.trim().to_string());
        validate_terms(
            request.name.as_deref(),
            request.price_cents,
            request.duration_days,
        )?;

        let plan = self.repo.update(id, request).await?;
        tracing::info!("Updated plan {} (active: {})", plan.id, plan.active);
        Ok(plan)
    }
}

fn validate_terms(
    name: Option<&str>,
    price_cents: Option<i64>,
    duration_days: Option<i64>,
) -> Result<()> {
    if matches!(name, Some(name) if name.is_empty()) {
        return Err(AppError::InvalidArgument("Plan name cannot be empty".to_string()));
    }

    if let Some(price_cents) = price_cents {
        if price_cents < 0 {
            return Err(AppError::InvalidArgument("Price cannot be negative".to_string()));
        }
    }

    if let Some(duration_days) = duration_days {
        if duration_days <= 0 {
            return Err(AppError::InvalidArgument(format!(
                "Duration must be at least one day, got {}",
                duration_days
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_terms() {
        assert!(validate_terms(Some("Monthly"), Some(0), Some(1)).is_ok());
        assert!(validate_terms(None, None, None).is_ok());
        assert!(validate_terms(Some(""), None, None).is_err());
        assert!(validate_terms(None, Some(-1), None).is_err());
        assert!(validate_terms(None, None, Some(0)).is_err());
    }
}
