use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{Notification, Page, Pagination, ReadReceipt};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", post(mark_all_as_read))
        .route("/:id/read", post(mark_as_read))
}

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

async fn list_notifications(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Page<Notification>>> {
    let pagination = Pagination::new(query.page, query.limit);
    let page = state
        .notification_service()
        .list_for_user(user.id, pagination)
        .await?;

    Ok(Json(page))
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

async fn unread_count(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UnreadCountResponse>> {
    let unread = state.notification_service().unread_count(user.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// POST /api/v1/notifications/:id/read
///
/// Answers with the location the client should navigate to.
async fn mark_as_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ReadReceipt>> {
    let notification_id = parse_id(&id, "notification")?;
    let receipt = state
        .notification_service()
        .mark_as_read(user.id, notification_id)
        .await?;

    Ok(Json(receipt))
}

#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
    pub updated: u64,
}

async fn mark_all_as_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MarkAllResponse>> {
    let updated = state.notification_service().mark_all_as_read(user.id).await?;
    Ok(Json(MarkAllResponse { updated }))
}
