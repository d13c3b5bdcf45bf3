use access_control::{Access, AccessSet, AdminPage};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{
    AuditAction, AuditLog, CreateAuditLog, CreateNotification, Notification, ResourceType,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pages", get(list_pages))
        .route("/accesses", get(list_accesses))
        .route("/notifications", post(send_notification))
        .route("/audit-logs", get(list_audit_logs))
}

#[derive(Debug, Serialize)]
pub struct PageEntry {
    pub page: AdminPage,
    pub slug: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub pages: Vec<PageEntry>,
    pub accesses: AccessSet,
}

/// Admin navigation for the caller: the pages its role opens.
async fn list_pages(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
) -> Result<Json<NavigationResponse>> {
    let accesses = state.access_guard().accesses_for(session.as_ref()).await?;

    let pages = AdminPage::visible_to(accesses.as_ref())
        .into_iter()
        .map(|page| PageEntry {
            page,
            slug: page.slug(),
            title: page.title(),
        })
        .collect();

    Ok(Json(NavigationResponse {
        pages,
        accesses: accesses.unwrap_or_default(),
    }))
}

#[derive(Debug, Serialize)]
pub struct AccessEntry {
    pub token: Access,
    pub label: &'static str,
}

async fn list_accesses(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
) -> Result<Json<Vec<AccessEntry>>> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::ViewRoles.into())
        .await?;

    let entries = Access::ALL
        .into_iter()
        .map(|token| AccessEntry {
            token,
            label: token.label(),
        })
        .collect();

    Ok(Json(entries))
}

async fn send_notification(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
    Json(payload): Json<CreateNotification>,
) -> Result<(StatusCode, Json<Notification>)> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::SendNotifications.into())
        .await?;

    let notification = state.notification_service().notify(payload).await?;

    if let Some(actor) = session {
        state
            .audit_service()
            .record(CreateAuditLog {
                actor_id: actor.id,
                action: AuditAction::SendNotification,
                resource_type: ResourceType::Notification,
                resource_id: Some(notification.id.to_string()),
                details: Some(json!({
                    "recipient_id": notification.user_id,
                    "title": notification.title,
                })),
            })
            .await;
    }

    Ok((StatusCode::CREATED, Json(notification)))
}

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<i64>,
}

async fn list_audit_logs(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<Vec<AuditLog>>> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::ViewAuditLogs.into())
        .await?;

    let logs = state
        .audit_service()
        .list_recent(query.limit.unwrap_or(50))
        .await?;

    Ok(Json(logs))
}
