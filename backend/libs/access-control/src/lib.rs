//! Marketplace access control
//!
//! Role-based gate for the admin area. A role is a set of [`Access`] tokens;
//! pages and actions declare a [`Requirement`]; [`grant`] decides.
//!
//! The gate is a pure predicate. It performs no I/O and never fails: callers
//! fetch the role, call [`grant`], and render their own denial.
//!
//! ```
//! use access_control::{grant, Access, AccessSet, Requirement};
//!
//! let role = AccessSet::from([Access::UpdateCoupon]);
//! assert!(grant(Some(&role), &Access::UpdateCoupon.into()));
//! assert!(!grant(Some(&role), &Access::ViewReports.into()));
//! assert!(grant(None, &Requirement::Always));
//! ```

pub mod access;
pub mod pages;
pub mod requirement;

pub use access::{Access, AccessSet, ParseAccessError};
pub use pages::AdminPage;
pub use requirement::{grant, Requirement};
