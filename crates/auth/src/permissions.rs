//! Permission tokens and the computed grant set.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::roles::{EffectiveRole, compute_effective_role};
use crate::user::{BaseRole, DepartmentName, UserRecord};

/// Permission identifier from a closed taxonomy (e.g. `clock:manage`).
///
/// Tokens are opaque strings to consumers; the taxonomy itself is defined by
/// the associated constants below plus the department-scoped token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const CLOCK_MANAGE: Permission = Permission(Cow::Borrowed("clock:manage"));
    pub const LEAVE_REQUEST: Permission = Permission(Cow::Borrowed("leave:request"));
    pub const PROFILE_READ: Permission = Permission(Cow::Borrowed("profile:read"));
    pub const ACTIVITY_READ_OWN: Permission = Permission(Cow::Borrowed("activity:read_own"));

    pub const USER_CREATE: Permission = Permission(Cow::Borrowed("user:create"));
    pub const USER_READ: Permission = Permission(Cow::Borrowed("user:read"));
    pub const USER_UPDATE: Permission = Permission(Cow::Borrowed("user:update"));
    pub const USER_DEACTIVATE: Permission = Permission(Cow::Borrowed("user:deactivate"));
    pub const ACTIVITY_READ_ALL: Permission = Permission(Cow::Borrowed("activity:read_all"));
    pub const SYSTEM_CONFIGURE: Permission = Permission(Cow::Borrowed("system:configure"));

    pub const MONITORING_SITE: Permission = Permission(Cow::Borrowed("monitoring:site"));
    pub const ACTIVITY_READ_SITE: Permission = Permission(Cow::Borrowed("activity:read_site"));

    pub const LEAVE_APPROVE_TEAM: Permission = Permission(Cow::Borrowed("leave:approve_team"));
    pub const USER_READ_TEAM: Permission = Permission(Cow::Borrowed("user:read_team"));
    pub const ACTIVITY_READ_TEAM: Permission = Permission(Cow::Borrowed("activity:read_team"));

    pub const LEAVE_APPROVE_EXECUTIVE: Permission =
        Permission(Cow::Borrowed("leave:approve_executive"));
    pub const USER_READ_DEPARTMENT: Permission = Permission(Cow::Borrowed("user:read_department"));
    pub const STRATEGY_VIEW: Permission = Permission(Cow::Borrowed("strategy:view"));

    pub const LEAVE_APPROVE_ALL: Permission = Permission(Cow::Borrowed("leave:approve_all"));
    pub const USER_READ_ALL: Permission = Permission(Cow::Borrowed("user:read_all"));
    pub const EXECUTIVE_ACCESS: Permission = Permission(Cow::Borrowed("executive:access"));
    pub const STRATEGY_MANAGE: Permission = Permission(Cow::Borrowed("strategy:manage"));

    pub const LOCATION_MULTI_ACCESS: Permission = Permission(Cow::Borrowed("location:multi_access"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Department-scoped token, e.g. `department:site_security`.
    pub fn department_scope(department: &DepartmentName) -> Self {
        Self(Cow::Owned(format!(
            "department:{}",
            department.permission_slug()
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Grant tables
// ─────────────────────────────────────────────────────────────────────────────

const STAFF_GRANTS: &[Permission] = &[
    Permission::CLOCK_MANAGE,
    Permission::LEAVE_REQUEST,
    Permission::PROFILE_READ,
    Permission::ACTIVITY_READ_OWN,
];

const ADMIN_GRANTS: &[Permission] = &[
    Permission::USER_CREATE,
    Permission::USER_READ,
    Permission::USER_UPDATE,
    Permission::USER_DEACTIVATE,
    Permission::ACTIVITY_READ_ALL,
    Permission::SYSTEM_CONFIGURE,
];

const SECURITY_GRANTS: &[Permission] = &[
    Permission::MONITORING_SITE,
    Permission::ACTIVITY_READ_SITE,
];

const MANAGER_GRANTS: &[Permission] = &[
    Permission::LEAVE_APPROVE_TEAM,
    Permission::USER_READ_TEAM,
    Permission::ACTIVITY_READ_TEAM,
];

const EXECUTIVE_GRANTS: &[Permission] = &[
    Permission::LEAVE_APPROVE_EXECUTIVE,
    Permission::USER_READ_DEPARTMENT,
    Permission::STRATEGY_VIEW,
];

const CEO_GRANTS: &[Permission] = &[
    Permission::LEAVE_APPROVE_ALL,
    Permission::USER_READ_ALL,
    Permission::EXECUTIVE_ACCESS,
    Permission::STRATEGY_MANAGE,
];

fn base_grants(role: BaseRole) -> &'static [Permission] {
    match role {
        BaseRole::Staff => STAFF_GRANTS,
        BaseRole::Admin => ADMIN_GRANTS,
        BaseRole::Security => SECURITY_GRANTS,
    }
}

/// Compute the full permission set for a record.
///
/// Deterministic and side-effect-free: same record in, same set out. The set
/// is built as a union of staged grants, so each higher ladder tier is a
/// strict superset of the tiers below it for the same record.
pub fn compute_permissions(user: &UserRecord) -> BTreeSet<Permission> {
    let effective = compute_effective_role(user);

    let mut grants: BTreeSet<Permission> = base_grants(user.base_role).iter().cloned().collect();

    if user.is_manager {
        grants.extend(MANAGER_GRANTS.iter().cloned());
    }
    if effective.at_least(EffectiveRole::Executive) {
        grants.extend(EXECUTIVE_GRANTS.iter().cloned());
    }
    if effective == EffectiveRole::Ceo {
        grants.extend(CEO_GRANTS.iter().cloned());
    }
    if user.allowed_location_ids.len() > 1 {
        grants.insert(Permission::LOCATION_MULTI_ACCESS);
    }
    grants.insert(Permission::department_scope(&user.department));

    grants
}
