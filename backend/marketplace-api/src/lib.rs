pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, Result};

use crate::db::Database;
use crate::repository::{
    AuditLogRepository, NotificationRepository, PgAuditLogRepository, PgNotificationRepository,
    PgRoleRepository, RoleRepository,
};
use crate::services::{AccessGuard, AuditService, NotificationService, RoleService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub roles: Arc<dyn RoleRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub audit_logs: Arc<dyn AuditLogRepository>,
}

impl AppState {
    pub fn postgres(db: &Database, config: Config) -> Self {
        Self {
            config,
            roles: Arc::new(PgRoleRepository::new(db.pg.clone())),
            notifications: Arc::new(PgNotificationRepository::new(db.pg.clone())),
            audit_logs: Arc::new(PgAuditLogRepository::new(db.pg.clone())),
        }
    }

    pub fn access_guard(&self) -> AccessGuard {
        AccessGuard::new(self.roles.clone(), self.config.access.deny_with_not_found)
    }

    pub fn notification_service(&self) -> NotificationService {
        NotificationService::new(self.notifications.clone())
    }

    pub fn role_service(&self) -> RoleService {
        RoleService::new(self.roles.clone())
    }

    pub fn audit_service(&self) -> AuditService {
        AuditService::new(self.audit_logs.clone())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::routes(state.clone()))
        .layer(from_fn_with_state(state.clone(), middleware::resolve_session))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
