//! Role-scoped dashboard chrome.
//!
//! The shell composer trusts its caller: the guard has already authorized
//! the role before a shell is built, so composition is pure presentation.
//! Each layout hard-wires both the allowed-role set handed to the guard and
//! the user type handed to the composer; the two must agree.

use common::types::{Role, UserType};
use serde::Serialize;
use service::auth::domain::AuthUser;
use service::guard::RoleSet;

#[derive(Clone, Debug, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

/// Navigation and header chrome for one role's dashboard area.
#[derive(Clone, Debug, Serialize)]
pub struct Shell {
    pub user_type: UserType,
    pub title: &'static str,
    pub nav: Vec<NavItem>,
}

impl Shell {
    pub fn for_user_type(user_type: UserType) -> Self {
        match user_type {
            UserType::Tenant => Self {
                user_type,
                title: "My Rental",
                nav: vec![
                    NavItem { label: "Overview", path: "/dashboard/tenant" },
                    NavItem { label: "My Lease", path: "/dashboard/tenant/lease" },
                    NavItem { label: "Payments", path: "/dashboard/tenant/payments" },
                    NavItem { label: "Maintenance", path: "/dashboard/tenant/maintenance" },
                ],
            },
            UserType::Landlord => Self {
                user_type,
                title: "Portfolio",
                nav: vec![
                    NavItem { label: "Overview", path: "/dashboard/landlord" },
                    NavItem { label: "Properties", path: "/dashboard/landlord/properties" },
                    NavItem { label: "Units", path: "/dashboard/landlord/units" },
                    NavItem { label: "Leases", path: "/dashboard/landlord/leases" },
                    NavItem { label: "Maintenance", path: "/dashboard/landlord/maintenance" },
                    NavItem { label: "Payments", path: "/dashboard/landlord/payments" },
                ],
            },
            UserType::Admin => Self {
                user_type,
                title: "Administration",
                nav: vec![
                    NavItem { label: "Overview", path: "/dashboard/admin" },
                    NavItem { label: "Users", path: "/dashboard/admin/users" },
                    NavItem { label: "Properties", path: "/dashboard/admin/properties" },
                    NavItem { label: "Reports", path: "/dashboard/admin/reports" },
                ],
            },
        }
    }
}

/// A guarded dashboard response: chrome around role-specific content.
#[derive(Debug, Serialize)]
pub struct DashboardPage<T: Serialize> {
    pub shell: Shell,
    pub user: AuthUser,
    pub content: T,
}

/// One dashboard area: the user type for the composer and the allowed-role
/// set for the guard, fixed together at the call site.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub user_type: UserType,
    pub allowed: RoleSet,
}

impl Layout {
    pub fn tenant() -> Self {
        Self { user_type: UserType::Tenant, allowed: RoleSet::single(Role::Tenant) }
    }

    pub fn landlord() -> Self {
        Self { user_type: UserType::Landlord, allowed: RoleSet::single(Role::Landlord) }
    }

    /// Strict singleton: only ADMIN, never a wider set.
    pub fn admin() -> Self {
        Self { user_type: UserType::Admin, allowed: RoleSet::single(Role::Admin) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_keep_guard_and_shell_in_agreement() {
        for layout in [Layout::tenant(), Layout::landlord(), Layout::admin()] {
            let role = layout.user_type.role();
            assert!(layout.allowed.contains(role));
            // Exactly one role per area
            let members: Vec<_> = layout.allowed.roles().collect();
            assert_eq!(members, vec![role]);
        }
    }

    #[test]
    fn admin_allowed_set_is_strict_singleton() {
        let layout = Layout::admin();
        assert!(layout.allowed.contains(Role::Admin));
        assert!(!layout.allowed.contains(Role::Landlord));
        assert!(!layout.allowed.contains(Role::Tenant));
    }

    #[test]
    fn every_shell_has_navigation() {
        for ut in [UserType::Tenant, UserType::Landlord, UserType::Admin] {
            let shell = Shell::for_user_type(ut);
            assert_eq!(shell.user_type, ut);
            assert!(!shell.nav.is_empty());
            assert!(shell.nav.iter().any(|n| n.path == ut.role().home_path()));
        }
    }
}
