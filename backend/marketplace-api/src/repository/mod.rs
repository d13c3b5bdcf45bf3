//! Storage seams.
//!
//! Handlers and services only see these traits. `Pg*` types back them with
//! PostgreSQL; `memory` keeps everything in process for tests and local runs.

mod audit_logs;
pub mod memory;
mod notifications;
mod roles;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    AuditLog, CreateAuditLog, CreateRole, Notification, Pagination, Role, UpdateRole,
};

pub use audit_logs::PgAuditLogRepository;
pub use notifications::PgNotificationRepository;
pub use roles::PgRoleRepository;

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>>;

    /// The role referenced by the user, with its granted accesses. `None`
    /// when the user is unknown or has no role.
    async fn find_for_user(&self, user_id: Uuid) -> Result<Option<Role>>;

    async fn list(&self) -> Result<Vec<Role>>;

    /// Fails with `Conflict` when the name is taken.
    async fn create(&self, input: CreateRole) -> Result<Role>;

    /// `Ok(None)` when no role has this id.
    async fn update(&self, id: Uuid, input: UpdateRole) -> Result<Option<Role>>;

    /// Returns whether a row was removed. Fails with `Conflict` while users
    /// still reference the role.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn count_members(&self, id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>>;

    /// Single-row idempotent update guarded by ownership. `read_at` keeps
    /// its first value. Returns whether a row matched.
    async fn mark_read(&self, id: Uuid, owner_id: Uuid, now: DateTime<Utc>) -> Result<bool>;

    /// Returns the number of notifications that went unread→read.
    async fn mark_all_read(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<u64>;

    /// Newest first, with the total count for the owner.
    async fn list_for_user(
        &self,
        owner_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<Notification>, i64)>;

    async fn unread_count(&self, owner_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn insert(&self, entry: CreateAuditLog) -> Result<AuditLog>;

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLog>>;
}

fn unique_violation_as_conflict(err: sqlx::Error, message: impl Into<String>) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(message.into()),
        _ => AppError::Database(err),
    }
}

fn foreign_key_violation_as_conflict(err: sqlx::Error, message: impl Into<String>) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::Conflict(message.into())
        }
        _ => AppError::Database(err),
    }
}
