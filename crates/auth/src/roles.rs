//! Effective-role derivation.
//!
//! The staff→manager→executive→ceo ladder is a lattice: every higher tier
//! satisfies all predicates of the tiers below it (a CEO is also treated as
//! a manager and as staff wherever those checks are consulted
//! independently). Admin and security sit outside the ladder.

use serde::{Deserialize, Serialize};

use crate::user::{BaseRole, SubRole, UserRecord};

/// Resolved position of a user; computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveRole {
    Staff,
    Manager,
    Executive,
    Ceo,
    Admin,
    Security,
}

impl EffectiveRole {
    /// Rank on the staff ladder; `None` for the orthogonal roles.
    pub fn seniority(self) -> Option<u8> {
        match self {
            EffectiveRole::Staff => Some(0),
            EffectiveRole::Manager => Some(1),
            EffectiveRole::Executive => Some(2),
            EffectiveRole::Ceo => Some(3),
            EffectiveRole::Admin | EffectiveRole::Security => None,
        }
    }

    pub fn at_least(self, tier: EffectiveRole) -> bool {
        match (self.seniority(), tier.seniority()) {
            (Some(mine), Some(required)) => mine >= required,
            _ => self == tier,
        }
    }
}

impl core::fmt::Display for EffectiveRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            EffectiveRole::Staff => "staff",
            EffectiveRole::Manager => "manager",
            EffectiveRole::Executive => "executive",
            EffectiveRole::Ceo => "ceo",
            EffectiveRole::Admin => "admin",
            EffectiveRole::Security => "security",
        };
        f.write_str(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule table
// ─────────────────────────────────────────────────────────────────────────────

/// One derivation rule: first match wins.
struct RoleRule {
    name: &'static str,
    applies: fn(&UserRecord) -> bool,
    resolve: fn(&UserRecord) -> EffectiveRole,
}

fn has_ceo_sub_role(user: &UserRecord) -> bool {
    user.sub_role == Some(SubRole::Ceo)
}

fn is_executive(user: &UserRecord) -> bool {
    user.sub_role == Some(SubRole::Executive)
        || (user.is_manager && user.department.is_executive_tier())
}

fn is_manager(user: &UserRecord) -> bool {
    user.is_manager
}

fn always(_: &UserRecord) -> bool {
    true
}

fn ceo(_: &UserRecord) -> EffectiveRole {
    EffectiveRole::Ceo
}

fn executive(_: &UserRecord) -> EffectiveRole {
    EffectiveRole::Executive
}

fn manager(_: &UserRecord) -> EffectiveRole {
    EffectiveRole::Manager
}

fn base(user: &UserRecord) -> EffectiveRole {
    match user.base_role {
        BaseRole::Staff => EffectiveRole::Staff,
        BaseRole::Admin => EffectiveRole::Admin,
        BaseRole::Security => EffectiveRole::Security,
    }
}

const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        name: "ceo sub-role",
        applies: has_ceo_sub_role,
        resolve: ceo,
    },
    RoleRule {
        name: "executive sub-role or manager of an executive-tier department",
        applies: is_executive,
        resolve: executive,
    },
    RoleRule {
        name: "manager flag",
        applies: is_manager,
        resolve: manager,
    },
    RoleRule {
        name: "base role",
        applies: always,
        resolve: base,
    },
];

/// Derive the effective role for a record.
pub fn compute_effective_role(user: &UserRecord) -> EffectiveRole {
    for rule in ROLE_RULES {
        if (rule.applies)(user) {
            let role = (rule.resolve)(user);
            tracing::trace!(email = %user.email, rule = rule.name, %role, "resolved role");
            return role;
        }
    }
    unreachable!("final rule always applies")
}

// ─────────────────────────────────────────────────────────────────────────────
// Role hints (portal selection)
// ─────────────────────────────────────────────────────────────────────────────

/// Caller-declared expected role, used to reject logins on the wrong portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleHint {
    Staff,
    Admin,
    Security,
    Ceo,
}

impl RoleHint {
    pub fn matches(self, user: &UserRecord) -> bool {
        match self {
            RoleHint::Staff => user.base_role == BaseRole::Staff,
            RoleHint::Admin => user.base_role == BaseRole::Admin,
            RoleHint::Security => user.base_role == BaseRole::Security,
            RoleHint::Ceo => user.sub_role == Some(SubRole::Ceo),
        }
    }
}
