use access_control::Access;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::parse_id;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{AuditAction, CreateAuditLog, CreateRole, ResourceType, Role, UpdateRole};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
}

async fn list_roles(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
) -> Result<Json<Vec<Role>>> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::ViewRoles.into())
        .await?;

    Ok(Json(state.role_service().list().await?))
}

async fn get_role(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Role>> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::ViewRoles.into())
        .await?;

    let role_id = parse_id(&id, "role")?;
    Ok(Json(state.role_service().get(role_id).await?))
}

async fn create_role(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
    Json(payload): Json<CreateRole>,
) -> Result<(StatusCode, Json<Role>)> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::CreateRole.into())
        .await?;

    let role = state.role_service().create(payload).await?;

    if let Some(actor) = session {
        state
            .audit_service()
            .record(CreateAuditLog {
                actor_id: actor.id,
                action: AuditAction::CreateRole,
                resource_type: ResourceType::Role,
                resource_id: Some(role.id.to_string()),
                details: Some(json!({
                    "name": role.name,
                    "accesses": role.accesses,
                })),
            })
            .await;
    }

    Ok((StatusCode::CREATED, Json(role)))
}

async fn update_role(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRole>,
) -> Result<Json<Role>> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::UpdateRole.into())
        .await?;

    let role_id = parse_id(&id, "role")?;
    let role = state.role_service().update(role_id, payload).await?;

    if let Some(actor) = session {
        state
            .audit_service()
            .record(CreateAuditLog {
                actor_id: actor.id,
                action: AuditAction::UpdateRole,
                resource_type: ResourceType::Role,
                resource_id: Some(role.id.to_string()),
                details: Some(json!({
                    "name": role.name,
                    "accesses": role.accesses,
                })),
            })
            .await;
    }

    Ok(Json(role))
}

async fn delete_role(
    State(state): State<AppState>,
    session: Option<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state
        .access_guard()
        .authorize(session.as_ref(), &Access::DeleteRole.into())
        .await?;

    let role_id = parse_id(&id, "role")?;
    state.role_service().delete(role_id).await?;

    if let Some(actor) = session {
        state
            .audit_service()
            .record(CreateAuditLog {
                actor_id: actor.id,
                action: AuditAction::DeleteRole,
                resource_type: ResourceType::Role,
                resource_id: Some(id),
                details: None,
            })
            .await;
    }

    Ok(StatusCode::NO_CONTENT)
}
