use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single permission token.
///
/// The universe is closed: tokens are seeded into the `accesses` table once
/// and never created at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    // Catalog taxonomy
    ViewCategories,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    ViewBrands,
    CreateBrand,
    UpdateBrand,
    DeleteBrand,
    ViewModels,
    CreateModel,
    UpdateModel,
    DeleteModel,
    // Coupons
    ViewCoupons,
    CreateCoupon,
    UpdateCoupon,
    DeleteCoupon,
    // Access control
    ViewRoles,
    CreateRole,
    UpdateRole,
    DeleteRole,
    // Users
    ViewUsers,
    UpdateUser,
    // Reporting
    ViewReports,
    ViewAuditLogs,
    SendNotifications,
}

impl Access {
    pub const ALL: [Access; 25] = [
        Access::ViewCategories,
        Access::CreateCategory,
        Access::UpdateCategory,
        Access::DeleteCategory,
        Access::ViewBrands,
        Access::CreateBrand,
        Access::UpdateBrand,
        Access::DeleteBrand,
        Access::ViewModels,
        Access::CreateModel,
        Access::UpdateModel,
        Access::DeleteModel,
        Access::ViewCoupons,
        Access::CreateCoupon,
        Access::UpdateCoupon,
        Access::DeleteCoupon,
        Access::ViewRoles,
        Access::CreateRole,
        Access::UpdateRole,
        Access::DeleteRole,
        Access::ViewUsers,
        Access::UpdateUser,
        Access::ViewReports,
        Access::ViewAuditLogs,
        Access::SendNotifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::ViewCategories => "view_categories",
            Access::CreateCategory => "create_category",
            Access::UpdateCategory => "update_category",
            Access::DeleteCategory => "delete_category",
            Access::ViewBrands => "view_brands",
            Access::CreateBrand => "create_brand",
            Access::UpdateBrand => "update_brand",
            Access::DeleteBrand => "delete_brand",
            Access::ViewModels => "view_models",
            Access::CreateModel => "create_model",
            Access::UpdateModel => "update_model",
            Access::DeleteModel => "delete_model",
            Access::ViewCoupons => "view_coupons",
            Access::CreateCoupon => "create_coupon",
            Access::UpdateCoupon => "update_coupon",
            Access::DeleteCoupon => "delete_coupon",
            Access::ViewRoles => "view_roles",
            Access::CreateRole => "create_role",
            Access::UpdateRole => "update_role",
            Access::DeleteRole => "delete_role",
            Access::ViewUsers => "view_users",
            Access::UpdateUser => "update_user",
            Access::ViewReports => "view_reports",
            Access::ViewAuditLogs => "view_audit_logs",
            Access::SendNotifications => "send_notifications",
        }
    }

    /// Human-readable name shown in the admin role editor.
    pub fn label(&self) -> &'static str {
        match self {
            Access::ViewCategories => "View categories",
            Access::CreateCategory => "Create category",
            Access::UpdateCategory => "Update category",
            Access::DeleteCategory => "Delete category",
            Access::ViewBrands => "View brands",
            Access::CreateBrand => "Create brand",
            Access::UpdateBrand => "Update brand",
            Access::DeleteBrand => "Delete brand",
            Access::ViewModels => "View models",
            Access::CreateModel => "Create model",
            Access::UpdateModel => "Update model",
            Access::DeleteModel => "Delete model",
            Access::ViewCoupons => "View coupons",
            Access::CreateCoupon => "Create coupon",
            Access::UpdateCoupon => "Update coupon",
            Access::DeleteCoupon => "Delete coupon",
            Access::ViewRoles => "View roles",
            Access::CreateRole => "Create role",
            Access::UpdateRole => "Update role",
            Access::DeleteRole => "Delete role",
            Access::ViewUsers => "View users",
            Access::UpdateUser => "Update user",
            Access::ViewReports => "View reports",
            Access::ViewAuditLogs => "View audit logs",
            Access::SendNotifications => "Send notifications",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown access token: {0}")]
pub struct ParseAccessError(pub String);

impl FromStr for Access {
    type Err = ParseAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Access::ALL
            .iter()
            .copied()
            .find(|access| access.as_str() == s)
            .ok_or_else(|| ParseAccessError(s.to_string()))
    }
}

/// The accesses granted to a role. Membership is all that matters; ordering
/// only keeps serialized output stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessSet(BTreeSet<Access>);

impl AccessSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every token in the universe. Used for the seeded super admin role.
    pub fn all() -> Self {
        Access::ALL.into_iter().collect()
    }

    pub fn contains(&self, access: Access) -> bool {
        self.0.contains(&access)
    }

    pub fn insert(&mut self, access: Access) -> bool {
        self.0.insert(access)
    }

    pub fn remove(&mut self, access: Access) -> bool {
        self.0.remove(&access)
    }

    pub fn iter(&self) -> impl Iterator<Item = Access> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses stored token strings. Unknown tokens fail the whole set so a
    /// role is never silently narrowed.
    pub fn parse_all<I, S>(tokens: I) -> Result<Self, ParseAccessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|token| token.as_ref().parse::<Access>())
            .collect()
    }
}

impl FromIterator<Access> for AccessSet {
    fn from_iter<T: IntoIterator<Item = Access>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Access; N]> for AccessSet {
    fn from(accesses: [Access; N]) -> Self {
        accesses.into_iter().collect()
    }
}

impl IntoIterator for AccessSet {
    type Item = Access;
    type IntoIter = std::collections::btree_set::IntoIter<Access>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
