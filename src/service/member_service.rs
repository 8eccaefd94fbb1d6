use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{CreateMemberRequest, Member},
    error::{AppError, Result},
    repository::MemberRepository,
};

pub struct MemberService {
    repo: Arc<dyn MemberRepository>,
}

impl MemberService {
    pub fn new(repo: Arc<dyn MemberRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_member(&self, mut request: CreateMemberRequest) -> Result<Member> {
        request.full_name = request.full_name.trim().to_string();
        if request.full_name.is_empty() {
            return Err(AppError::InvalidArgument("Member name cannot be empty".to_string()));
        }

        let member = self.repo.create(request).await?;
        tracing::info!("Registered member {}", member.id);
        Ok(member)
    }

    pub async fn get_member(&self, id: Uuid) -> Result<Member> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))
    }

    pub async fn list_members(&self) -> Result<Vec<Member>> {
        self.repo.list().await
    }
}
