//! In-process repositories used by the test suites and by local runs
//! without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuditLogRepository, NotificationRepository, RoleRepository};
use crate::error::{AppError, Result};
use crate::models::{
    AuditLog, CreateAuditLog, CreateRole, Notification, Pagination, Role, UpdateRole,
};

#[derive(Default)]
struct RoleTables {
    roles: HashMap<Uuid, Role>,
    /// user id → role id
    users: HashMap<Uuid, Uuid>,
}

#[derive(Default)]
pub struct InMemoryRoleRepository {
    tables: RwLock<RoleTables>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the user at a role, like setting `users.role_id`.
    pub async fn assign(&self, user_id: Uuid, role_id: Uuid) {
        self.tables.write().await.users.insert(user_id, role_id);
    }

    pub async fn unassign(&self, user_id: Uuid) {
        self.tables.write().await.users.remove(&user_id);
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(&user_id)
            .and_then(|role_id| tables.roles.get(role_id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Role>> {
        let mut roles: Vec<Role> = self.tables.read().await.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create(&self, input: CreateRole) -> Result<Role> {
        let mut tables = self.tables.write().await;
        if tables.roles.values().any(|r| r.name == input.name) {
            return Err(AppError::Conflict(format!(
                "Role name '{}' is already taken",
                input.name
            )));
        }

        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            accesses: input.accesses,
            created_at: now,
            updated_at: now,
        };
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update(&self, id: Uuid, input: UpdateRole) -> Result<Option<Role>> {
        let mut tables = self.tables.write().await;

        if let Some(name) = &input.name {
            if tables.roles.values().any(|r| r.id != id && &r.name == name) {
                return Err(AppError::Conflict("Role name is already taken".to_string()));
            }
        }

        let Some(role) = tables.roles.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = input.name {
            role.name = name;
        }
        if let Some(description) = input.description {
            role.description = description;
        }
        if let Some(accesses) = input.accesses {
            role.accesses = accesses;
        }
        role.updated_at = Utc::now();

        Ok(Some(role.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|role_id| *role_id == id) {
            return Err(AppError::Conflict("Role is still assigned to users".to_string()));
        }
        Ok(tables.roles.remove(&id).is_some())
    }

    async fn count_members(&self, id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().filter(|role_id| **role_id == id).count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    rows: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<()> {
        self.rows
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn mark_read(&self, id: Uuid, owner_id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(n) if n.user_id == owner_id => {
                n.mark_read(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<u64> {
        let mut rows = self.rows.write().await;
        let mut updated = 0;
        for n in rows.values_mut().filter(|n| n.user_id == owner_id) {
            if n.mark_read(now) {
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn list_for_user(
        &self,
        owner_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<Notification>, i64)> {
        let rows = self.rows.read().await;
        let mut owned: Vec<Notification> = rows
            .values()
            .filter(|n| n.user_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = owned.len() as i64;
        let page = owned
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn unread_count(&self, owner_id: Uuid) -> Result<i64> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|n| n.user_id == owner_id && !n.is_read)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    entries: RwLock<Vec<AuditLog>>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn insert(&self, entry: CreateAuditLog) -> Result<AuditLog> {
        let log = AuditLog {
            id: Uuid::new_v4(),
            actor_id: entry.actor_id,
            action: entry.action.as_str().to_string(),
            resource_type: entry.resource_type.as_str().to_string(),
            resource_id: entry.resource_id,
            details: entry.details,
            created_at: Utc::now(),
        };
        self.entries.write().await.push(log.clone());
        Ok(log)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLog>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
