mod admin;
mod notifications;
mod roles;

use axum::{middleware::from_fn_with_state, Router};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::require_admin_area;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/notifications", notifications::routes())
        .nest(
            "/admin",
            admin::routes()
                .nest("/roles", roles::routes())
                .route_layer(from_fn_with_state(state, require_admin_area)),
        )
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}
