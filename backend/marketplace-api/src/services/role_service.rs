use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{CreateRole, Role, UpdateRole};
use crate::repository::RoleRepository;

/// Admin role management. Authorization happens in the handlers; this layer
/// enforces the role lifecycle rules.
pub struct RoleService {
    repo: Arc<dyn RoleRepository>,
}

impl RoleService {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Role>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Role> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role {} not found", id)))
    }

    pub async fn create(&self, mut input: CreateRole) -> Result<Role> {
        input.name = input.name.trim().to_string();
        input.validate()?;

        let role = self.repo.create(input).await?;
        tracing::info!(
            role_id = %role.id,
            name = %role.name,
            accesses = role.accesses.len(),
            "Role created"
        );
        Ok(role)
    }

    pub async fn update(&self, id: Uuid, mut input: UpdateRole) -> Result<Role> {
        if input.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }
        input.name = input.name.map(|name| name.trim().to_string());
        input.validate()?;

        let role = self
            .repo
            .update(id, input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role {} not found", id)))?;

        tracing::info!(role_id = %role.id, accesses = role.accesses.len(), "Role updated");
        Ok(role)
    }

    /// Deletes a role nobody references.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let members = self.repo.count_members(id).await?;
        if members > 0 {
            return Err(AppError::Conflict(format!(
                "Role is assigned to {} user(s)",
                members
            )));
        }

        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Role {} not found", id)));
        }

        tracing::info!(role_id = %id, "Role deleted");
        Ok(())
    }
}
