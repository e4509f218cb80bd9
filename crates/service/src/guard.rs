//! The access guard: a pure decision over the current session and the role
//! set a protected area allows.
//!
//! The guard's only externally observable effect is navigation; it mutates
//! nothing, so re-evaluating it against an unchanged state always yields the
//! same decision.

use common::types::Role;

use crate::session::AuthState;

/// Non-empty set of roles allowed into a protected area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    fn bit(role: Role) -> u8 {
        match role {
            Role::Admin => 1 << 0,
            Role::Landlord => 1 << 1,
            Role::Tenant => 1 << 2,
        }
    }

    pub fn single(role: Role) -> Self {
        Self(Self::bit(role))
    }

    /// Build from a slice; `None` for an empty slice, which would make the
    /// guarded area unreachable for everyone.
    pub fn of(roles: &[Role]) -> Option<Self> {
        if roles.is_empty() {
            return None;
        }
        Some(Self(roles.iter().fold(0, |acc, r| acc | Self::bit(*r))))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

/// What the caller should do with the protected subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: show a neutral indicator, neither render nor
    /// redirect yet.
    Loading,
    /// Actor is present and allowed: render the content unmodified.
    Render,
    /// No session: go to the login entry point, carrying the requested path
    /// so the actor returns there afterwards.
    RedirectToLogin { return_to: String },
    /// Authenticated but the role is not allowed here: silently send the
    /// actor to their own landing page, never to the requested one.
    Redirect { location: String },
}

pub fn evaluate(allowed: &RoleSet, state: &AuthState, requested_path: &str) -> GuardDecision {
    if state.is_loading {
        return GuardDecision::Loading;
    }
    match &state.user {
        None => GuardDecision::RedirectToLogin { return_to: requested_path.to_string() },
        Some(user) if allowed.contains(user.role) => GuardDecision::Render,
        Some(user) => GuardDecision::Redirect { location: user.role.home_path().to_string() },
    }
}
