//! Route/resource access decisions.

use serde::Serialize;

use crate::error::{AuthError, AuthResult};
use crate::permissions::{Permission, compute_permissions};
use crate::roles::{EffectiveRole, compute_effective_role};
use crate::routes;
use crate::user::{BaseRole, Session, UserRecord};

/// Role requirement on a route, with the hierarchy aliasing the pages rely
/// on: `Manager` is satisfied by any manager-or-above, `Staff` by a staff
/// base role or any tier derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredRole {
    Staff,
    Admin,
    Security,
    Manager,
    Executive,
    Ceo,
}

impl RequiredRole {
    pub fn satisfied_by(self, user: &UserRecord) -> bool {
        let effective = compute_effective_role(user);
        match self {
            RequiredRole::Staff => {
                user.base_role == BaseRole::Staff || effective.at_least(EffectiveRole::Manager)
            }
            RequiredRole::Admin => user.base_role == BaseRole::Admin,
            RequiredRole::Security => user.base_role == BaseRole::Security,
            RequiredRole::Manager => user.is_manager || effective.at_least(EffectiveRole::Executive),
            RequiredRole::Executive => effective.at_least(EffectiveRole::Executive),
            RequiredRole::Ceo => effective == EffectiveRole::Ceo,
        }
    }
}

/// Why a navigation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NotAuthenticated,
    Unverified,
    Deactivated,
    RouteUnauthorized,
    MissingRole,
    MissingPermission,
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny {
        reason: DenyReason,
        redirect: String,
        /// The originally requested path, kept so the login flow can return
        /// the user there afterwards.
        return_to: Option<String>,
    },
}

impl Decision {
    fn deny(reason: DenyReason, redirect: impl Into<String>) -> Self {
        Decision::Deny {
            reason,
            redirect: redirect.into(),
            return_to: None,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Map a denial onto the error taxonomy for callers that propagate
    /// rather than redirect.
    pub fn require(self) -> AuthResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny {
                reason: DenyReason::MissingPermission,
                ..
            } => Err(AuthError::PermissionDenied),
            Decision::Deny { .. } => Err(AuthError::RouteUnauthorized),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static path policy
// ─────────────────────────────────────────────────────────────────────────────

struct PathPolicy {
    prefix: &'static str,
    requirement: RequiredRole,
}

/// Portal prefixes and the role each one demands. Checked before the
/// per-route role list so that a portal mismatch sends the user to their own
/// landing page rather than the generic unauthorized screen.
const PATH_POLICIES: &[PathPolicy] = &[
    PathPolicy {
        prefix: "/admin",
        requirement: RequiredRole::Admin,
    },
    PathPolicy {
        prefix: "/ceo",
        requirement: RequiredRole::Ceo,
    },
    PathPolicy {
        prefix: "/manager",
        requirement: RequiredRole::Manager,
    },
    PathPolicy {
        prefix: "/security",
        requirement: RequiredRole::Security,
    },
    PathPolicy {
        prefix: "/staff",
        requirement: RequiredRole::Staff,
    },
];

// ─────────────────────────────────────────────────────────────────────────────
// Guard
// ─────────────────────────────────────────────────────────────────────────────

/// Decision function gating every protected navigation.
///
/// Stateless by design: everything it needs arrives as arguments, so each
/// check is a pure function of session, path, and requirements.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessGuard;

impl AccessGuard {
    /// Decide whether `session` may navigate to `path`.
    ///
    /// Short-circuit order: anonymous, unverified, deactivated, portal
    /// prefix policy, route role list, route permission list. The first
    /// failing check determines the redirect.
    pub fn decide(
        session: Option<&Session>,
        path: &str,
        required_roles: &[RequiredRole],
        required_permissions: &[Permission],
    ) -> Decision {
        let Some(session) = session else {
            return Decision::Deny {
                reason: DenyReason::NotAuthenticated,
                redirect: routes::LOGIN.to_string(),
                return_to: Some(path.to_string()),
            };
        };
        let user = &session.user;

        if !user.verified {
            return Decision::deny(DenyReason::Unverified, routes::VERIFY);
        }
        if !user.is_active {
            return Decision::deny(DenyReason::NotAuthenticated, routes::LOGIN);
        }

        for policy in PATH_POLICIES {
            if path.starts_with(policy.prefix) && !policy.requirement.satisfied_by(user) {
                tracing::debug!(email = %user.email, path, prefix = policy.prefix, "portal denied");
                return Decision::deny(DenyReason::RouteUnauthorized, routes::landing(user));
            }
        }

        if !required_roles.is_empty() && !required_roles.iter().any(|r| r.satisfied_by(user)) {
            return Decision::deny(DenyReason::MissingRole, routes::UNAUTHORIZED);
        }

        if !required_permissions.is_empty() {
            let granted = compute_permissions(user);
            if !required_permissions.iter().all(|p| granted.contains(p)) {
                return Decision::deny(DenyReason::MissingPermission, routes::UNAUTHORIZED);
            }
        }

        Decision::Allow
    }
}
