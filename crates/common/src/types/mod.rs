//! Canonical shared types for the platform.
//!
//! `Role` and the status enumerations are defined exactly once here; every
//! other crate consumes these definitions rather than redeclaring string
//! constants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Debug, Error)]
#[error("unknown tag: {0}")]
pub struct UnknownTag(pub String);

/// What an authenticated actor is allowed to do. Closed set; a session's
/// role never changes in place (a role change requires a new session).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Landlord,
    Tenant,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Landlord, Role::Tenant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Landlord => "LANDLORD",
            Role::Tenant => "TENANT",
        }
    }

    /// Default landing page for the role; the guard sends actors here when
    /// they request an area their role does not cover.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboard/admin",
            Role::Landlord => "/dashboard/landlord",
            Role::Tenant => "/dashboard/tenant",
        }
    }

    /// Roles a user may pick at registration time. `ADMIN` accounts are
    /// provisioned out of band, never self-assigned.
    pub fn is_self_registerable(&self) -> bool {
        matches!(self, Role::Landlord | Role::Tenant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "LANDLORD" => Ok(Role::Landlord),
            "TENANT" => Ok(Role::Tenant),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

/// Shell flavor tag for dashboard chrome. Bijective with `Role`; the layout
/// call sites must keep the two in agreement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Tenant,
    Landlord,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Tenant => "tenant",
            UserType::Landlord => "landlord",
            UserType::Admin => "admin",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            UserType::Tenant => Role::Tenant,
            UserType::Landlord => Role::Landlord,
            UserType::Admin => Role::Admin,
        }
    }
}

impl From<Role> for UserType {
    fn from(role: Role) -> Self {
        match role {
            Role::Tenant => UserType::Tenant,
            Role::Landlord => UserType::Landlord,
            Role::Admin => UserType::Admin,
        }
    }
}

/// Lease lifecycle tags, used for display and filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaseStatus {
    Pending,
    Active,
    Expired,
    Terminated,
}

impl LeaseStatus {
    pub const ALL: [LeaseStatus; 4] = [
        LeaseStatus::Pending,
        LeaseStatus::Active,
        LeaseStatus::Expired,
        LeaseStatus::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaseStatus::Pending => "PENDING",
            LeaseStatus::Active => "ACTIVE",
            LeaseStatus::Expired => "EXPIRED",
            LeaseStatus::Terminated => "TERMINATED",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    Open,
    InProgress,
    Resolved,
    Cancelled,
}

impl MaintenanceStatus {
    pub const ALL: [MaintenanceStatus; 4] = [
        MaintenanceStatus::Open,
        MaintenanceStatus::InProgress,
        MaintenanceStatus::Resolved,
        MaintenanceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Open => "OPEN",
            MaintenanceStatus::InProgress => "IN_PROGRESS",
            MaintenanceStatus::Resolved => "RESOLVED",
            MaintenanceStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenancePriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl MaintenancePriority {
    pub const ALL: [MaintenancePriority; 4] = [
        MaintenancePriority::Low,
        MaintenancePriority::Medium,
        MaintenancePriority::High,
        MaintenancePriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenancePriority::Low => "LOW",
            MaintenancePriority::Medium => "MEDIUM",
            MaintenancePriority::High => "HIGH",
            MaintenancePriority::Urgent => "URGENT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Overdue,
        PaymentStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Overdue => "OVERDUE",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}
