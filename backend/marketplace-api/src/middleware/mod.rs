mod access;
mod auth;

pub use access::require_admin_area;
pub use auth::{issue_token, resolve_session, verify_token, Claims, CurrentUser};
