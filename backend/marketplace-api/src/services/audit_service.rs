use std::sync::Arc;

use crate::error::Result;
use crate::models::{AuditLog, CreateAuditLog};
use crate::repository::AuditLogRepository;

pub struct AuditService {
    repo: Arc<dyn AuditLogRepository>,
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }

    /// Writes an audit entry. A failed write is logged and never fails the
    /// admin action that triggered it.
    pub async fn record(&self, entry: CreateAuditLog) {
        let action = entry.action;
        if let Err(e) = self.repo.insert(entry).await {
            tracing::warn!(action = action.as_str(), error = %e, "Failed to write audit log");
        }
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLog>> {
        self.repo.list_recent(limit.clamp(1, 500)).await
    }
}
