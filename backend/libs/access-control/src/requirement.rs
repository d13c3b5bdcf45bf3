use std::fmt;

use crate::access::{Access, AccessSet};
use crate::pages::AdminPage;

/// What a page or action demands from the caller's role.
///
/// There is deliberately no `Default`: an unguarded entry point has to say
/// `Requirement::Always` where it is declared.
#[derive(Clone)]
pub enum Requirement {
    /// No permission needed. Passes for every caller, including one with no
    /// role at all.
    Always,
    Access(Access),
    /// Passes on the first satisfied child. Empty never passes.
    AnyOf(Vec<Requirement>),
    /// Fails on the first unsatisfied child. Empty always passes.
    AllOf(Vec<Requirement>),
    /// Arbitrary rule over the whole granted set.
    Predicate(fn(&AccessSet) -> bool),
}

impl Requirement {
    pub fn any_of<I: IntoIterator<Item = Access>>(accesses: I) -> Self {
        Requirement::AnyOf(accesses.into_iter().map(Requirement::Access).collect())
    }

    pub fn all_of<I: IntoIterator<Item = Access>>(accesses: I) -> Self {
        Requirement::AllOf(accesses.into_iter().map(Requirement::Access).collect())
    }

    /// Entry to the admin area: the role must open at least one admin page
    /// beyond the dashboard, which is open to everyone.
    pub fn any_admin_page() -> Self {
        Requirement::Predicate(grants_any_admin_page)
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Requirement::Always)
    }

    /// Evaluates the requirement against a granted set.
    pub fn is_satisfied_by(&self, granted: &AccessSet) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::Access(access) => granted.contains(*access),
            Requirement::AnyOf(children) => children.iter().any(|c| c.is_satisfied_by(granted)),
            Requirement::AllOf(children) => children.iter().all(|c| c.is_satisfied_by(granted)),
            Requirement::Predicate(rule) => rule(granted),
        }
    }
}

fn grants_any_admin_page(granted: &AccessSet) -> bool {
    AdminPage::ALL
        .iter()
        .filter(|page| !page.requirement().is_always())
        .any(|page| page.requirement().is_satisfied_by(granted))
}

impl From<Access> for Requirement {
    fn from(access: Access) -> Self {
        Requirement::Access(access)
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Always => f.write_str("Always"),
            Requirement::Access(access) => write!(f, "Access({})", access),
            Requirement::AnyOf(children) => f.debug_tuple("AnyOf").field(children).finish(),
            Requirement::AllOf(children) => f.debug_tuple("AllOf").field(children).finish(),
            Requirement::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// The gate.
///
/// `role` is `None` when the caller has no session or no role. Only
/// `Requirement::Always` lets such a caller through.
pub fn grant(role: Option<&AccessSet>, requirement: &Requirement) -> bool {
    match (role, requirement) {
        (_, Requirement::Always) => true,
        (None, _) => false,
        (Some(granted), requirement) => requirement.is_satisfied_by(granted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_single_token_is_set_membership() {
        let set = AccessSet::from([Access::UpdateCoupon]);
        assert!(grant(Some(&set), &Access::UpdateCoupon.into()));
        assert!(!grant(Some(&set), &Access::ViewReports.into()));
    }

    #[test]
    fn test_always_passes_without_role() {
        assert!(grant(None, &Requirement::Always));
        assert!(grant(Some(&AccessSet::new()), &Requirement::Always));
    }

    #[test]
    fn test_absent_role_fails_composites() {
        assert!(!grant(None, &Requirement::AllOf(vec![])));
        assert!(!grant(None, &Requirement::any_admin_page()));
    }

    #[test]
    fn test_empty_composites() {
        let set = AccessSet::all();
        assert!(!grant(Some(&set), &Requirement::AnyOf(vec![])));
        assert!(grant(Some(&set), &Requirement::AllOf(vec![])));
    }

    #[test]
    fn test_any_of_and_all_of() {
        let set = AccessSet::from([Access::ViewRoles]);
        assert!(grant(
            Some(&set),
            &Requirement::any_of([Access::ViewReports, Access::ViewRoles])
        ));
        assert!(!grant(
            Some(&set),
            &Requirement::all_of([Access::ViewRoles, Access::UpdateRole])
        ));
    }

    thread_local! {
        static CALLS: Cell<u32> = const { Cell::new(0) };
    }

    fn counting(_: &AccessSet) -> bool {
        CALLS.with(|c| c.set(c.get() + 1));
        true
    }

    #[test]
    fn test_composites_short_circuit() {
        let set = AccessSet::from([Access::ViewRoles]);

        CALLS.with(|c| c.set(0));
        let any = Requirement::AnyOf(vec![
            Access::ViewRoles.into(),
            Requirement::Predicate(counting),
        ]);
        assert!(grant(Some(&set), &any));
        assert_eq!(CALLS.with(Cell::get), 0);

        let all = Requirement::AllOf(vec![
            Access::DeleteRole.into(),
            Requirement::Predicate(counting),
        ]);
        assert!(!grant(Some(&set), &all));
        assert_eq!(CALLS.with(Cell::get), 0);
    }

    #[test]
    fn test_any_admin_page_needs_more_than_the_dashboard() {
        assert!(!grant(Some(&AccessSet::new()), &Requirement::any_admin_page()));

        let coupons = AccessSet::from([Access::UpdateCoupon]);
        assert!(grant(Some(&coupons), &Requirement::any_admin_page()));
    }

    #[test]
    fn test_debug_hides_predicate_body() {
        let req = Requirement::AnyOf(vec![Access::ViewRoles.into(), Requirement::any_admin_page()]);
        assert_eq!(format!("{:?}", req), "AnyOf([Access(view_roles), Predicate(..)])");
    }
}
