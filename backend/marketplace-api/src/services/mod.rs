mod access_guard;
mod audit_service;
mod notification_service;
mod role_service;

pub use access_guard::*;
pub use audit_service::*;
pub use notification_service::*;
pub use role_service::*;
