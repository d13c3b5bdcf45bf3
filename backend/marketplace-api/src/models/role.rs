use access_control::AccessSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A named bundle of access tokens assigned to users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub accesses: AccessSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub description: String,
    #[serde(default)]
    pub accesses: AccessSet,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    pub accesses: Option<AccessSet>,
}

impl UpdateRole {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.accesses.is_none()
    }
}
