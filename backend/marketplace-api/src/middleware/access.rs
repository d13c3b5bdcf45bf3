use access_control::Requirement;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::CurrentUser;
use crate::error::AppError;
use crate::AppState;

/// Route layer for the admin tree: the caller's role must open at least one
/// admin page. Individual handlers still authorize their own action.
pub async fn require_admin_area(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = request.extensions().get::<CurrentUser>().copied();

    state
        .access_guard()
        .authorize(session.as_ref(), &Requirement::any_admin_page())
        .await?;

    Ok(next.run(request).await)
}
