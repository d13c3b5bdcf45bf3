use std::sync::Arc;

use access_control::{grant, AccessSet, Requirement};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::repository::RoleRepository;

/// Fetches the caller's role and runs the gate.
///
/// Anonymous callers and callers without a role are denied exactly like
/// callers whose role lacks the access.
#[derive(Clone)]
pub struct AccessGuard {
    roles: Arc<dyn RoleRepository>,
    deny_with_not_found: bool,
}

impl AccessGuard {
    pub fn new(roles: Arc<dyn RoleRepository>, deny_with_not_found: bool) -> Self {
        Self {
            roles,
            deny_with_not_found,
        }
    }

    /// The caller's granted accesses, `None` without a session or role.
    pub async fn accesses_for(&self, session: Option<&CurrentUser>) -> Result<Option<AccessSet>> {
        let Some(user) = session else {
            return Ok(None);
        };

        let role = self.roles.find_for_user(user.id).await?;
        Ok(role.map(|r| r.accesses))
    }

    pub async fn authorize(
        &self,
        session: Option<&CurrentUser>,
        requirement: &Requirement,
    ) -> Result<()> {
        if requirement.is_always() {
            return Ok(());
        }

        let accesses = self.accesses_for(session).await?;
        if grant(accesses.as_ref(), requirement) {
            return Ok(());
        }

        tracing::warn!(
            user_id = ?session.map(|u| u.id),
            has_role = accesses.is_some(),
            ?requirement,
            "Access denied"
        );
        Err(self.denial())
    }

    fn denial(&self) -> AppError {
        AppError::AccessDenied {
            hidden: self.deny_with_not_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateRole;
    use crate::repository::memory::InMemoryRoleRepository;
    use access_control::Access;
    use uuid::Uuid;

    async fn guard_with_role(
        accesses: AccessSet,
        deny_with_not_found: bool,
    ) -> (AccessGuard, CurrentUser) {
        let roles = Arc::new(InMemoryRoleRepository::new());
        let role = roles
            .create(CreateRole {
                name: "coupon-editor".to_string(),
                description: String::new(),
                accesses,
            })
            .await
            .unwrap();
        let user = CurrentUser { id: Uuid::new_v4() };
        roles.assign(user.id, role.id).await;

        (AccessGuard::new(roles, deny_with_not_found), user)
    }

    #[tokio::test]
    async fn test_role_holding_access_is_allowed() {
        let (guard, user) = guard_with_role(AccessSet::from([Access::UpdateCoupon]), true).await;

        guard
            .authorize(Some(&user), &Access::UpdateCoupon.into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_denial_maps_to_not_found_by_default() {
        let (guard, user) = guard_with_role(AccessSet::from([Access::UpdateCoupon]), true).await;

        let err = guard
            .authorize(Some(&user), &Access::ViewReports.into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied { hidden: true }));
    }

    #[tokio::test]
    async fn test_denial_maps_to_forbidden_when_configured() {
        let (guard, user) = guard_with_role(AccessSet::from([Access::UpdateCoupon]), false).await;

        let err = guard
            .authorize(Some(&user), &Access::ViewReports.into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied { hidden: false }));
    }

    #[tokio::test]
    async fn test_anonymous_caller_is_denied_like_missing_access() {
        let (guard, _) = guard_with_role(AccessSet::all(), true).await;

        let err = guard
            .authorize(None, &Access::ViewRoles.into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied { hidden: true }));
    }

    #[tokio::test]
    async fn test_user_without_role_is_denied() {
        let (guard, _) = guard_with_role(AccessSet::all(), true).await;
        let stranger = CurrentUser { id: Uuid::new_v4() };

        assert!(guard
            .authorize(Some(&stranger), &Access::ViewRoles.into())
            .await
            .is_err());
        assert_eq!(guard.accesses_for(Some(&stranger)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_always_skips_role_lookup() {
        let (guard, _) = guard_with_role(AccessSet::new(), true).await;

        guard.authorize(None, &Requirement::Always).await.unwrap();
    }
}
