use serde::Serialize;

use crate::access::{Access, AccessSet};
use crate::requirement::{grant, Requirement};

/// Pages of the admin area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminPage {
    Dashboard,
    Categories,
    Brands,
    Models,
    Coupons,
    Roles,
    Users,
    Reports,
    AuditLogs,
    Notifications,
}

impl AdminPage {
    pub const ALL: [AdminPage; 10] = [
        AdminPage::Dashboard,
        AdminPage::Categories,
        AdminPage::Brands,
        AdminPage::Models,
        AdminPage::Coupons,
        AdminPage::Roles,
        AdminPage::Users,
        AdminPage::Reports,
        AdminPage::AuditLogs,
        AdminPage::Notifications,
    ];

    /// The static page table. A page opens when the role holds any token of
    /// the page's family; the dashboard is the one open page.
    pub fn requirement(&self) -> Requirement {
        use Access::*;

        match self {
            AdminPage::Dashboard => Requirement::Always,
            AdminPage::Categories => Requirement::any_of([
                ViewCategories,
                CreateCategory,
                UpdateCategory,
                DeleteCategory,
            ]),
            AdminPage::Brands => {
                Requirement::any_of([ViewBrands, CreateBrand, UpdateBrand, DeleteBrand])
            }
            AdminPage::Models => {
                Requirement::any_of([ViewModels, CreateModel, UpdateModel, DeleteModel])
            }
            AdminPage::Coupons => {
                Requirement::any_of([ViewCoupons, CreateCoupon, UpdateCoupon, DeleteCoupon])
            }
            AdminPage::Roles => Requirement::any_of([ViewRoles, CreateRole, UpdateRole, DeleteRole]),
            AdminPage::Users => Requirement::any_of([ViewUsers, UpdateUser]),
            AdminPage::Reports => Requirement::Access(ViewReports),
            AdminPage::AuditLogs => Requirement::Access(ViewAuditLogs),
            AdminPage::Notifications => Requirement::Access(SendNotifications),
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            AdminPage::Dashboard => "dashboard",
            AdminPage::Categories => "categories",
            AdminPage::Brands => "brands",
            AdminPage::Models => "models",
            AdminPage::Coupons => "coupons",
            AdminPage::Roles => "roles",
            AdminPage::Users => "users",
            AdminPage::Reports => "reports",
            AdminPage::AuditLogs => "audit-logs",
            AdminPage::Notifications => "notifications",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AdminPage::Dashboard => "Dashboard",
            AdminPage::Categories => "Categories",
            AdminPage::Brands => "Brands",
            AdminPage::Models => "Models",
            AdminPage::Coupons => "Coupons",
            AdminPage::Roles => "Roles & access",
            AdminPage::Users => "Users",
            AdminPage::Reports => "Reports",
            AdminPage::AuditLogs => "Audit logs",
            AdminPage::Notifications => "Notifications",
        }
    }

    /// Pages the given role may open, in navigation order.
    pub fn visible_to(role: Option<&AccessSet>) -> Vec<AdminPage> {
        AdminPage::ALL
            .into_iter()
            .filter(|page| grant(role, &page.requirement()))
            .collect()
    }
}
