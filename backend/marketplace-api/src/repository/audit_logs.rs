use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::AuditLogRepository;
use crate::error::Result;
use crate::models::{AuditLog, CreateAuditLog};

#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn insert(&self, entry: CreateAuditLog) -> Result<AuditLog> {
        let log: AuditLog = sqlx::query_as(
            r#"
            INSERT INTO audit_logs (id, actor_id, action, resource_type, resource_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.actor_id)
        .bind(entry.action.as_str())
        .bind(entry.resource_type.as_str())
        .bind(entry.resource_id)
        .bind(entry.details)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLog>> {
        let logs: Vec<AuditLog> =
            sqlx::query_as("SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(logs)
    }
}
