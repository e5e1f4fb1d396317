//! User directory record and session snapshot.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crewgate_core::{DepartmentId, DomainError, Email, LocationId, StaffId};

use crate::credentials::PasswordHash;
use crate::routes;

// ─────────────────────────────────────────────────────────────────────────────
// Roles as stored on the record
// ─────────────────────────────────────────────────────────────────────────────

/// Portal-level role stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaseRole {
    #[default]
    Staff,
    Admin,
    Security,
}

impl core::fmt::Display for BaseRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BaseRole::Staff => write!(f, "staff"),
            BaseRole::Admin => write!(f, "admin"),
            BaseRole::Security => write!(f, "security"),
        }
    }
}

/// Optional refinement of a staff record's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubRole {
    Ceo,
    Executive,
}

// ─────────────────────────────────────────────────────────────────────────────
// Department name
// ─────────────────────────────────────────────────────────────────────────────

/// Department display name.
///
/// The name participates in role derivation (managers of executive-tier
/// departments resolve to `executive`) and in the department-scoped
/// permission token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentName(Cow<'static, str>);

impl DepartmentName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Departments whose managers sit at the executive tier.
    pub fn is_executive_tier(&self) -> bool {
        let name = self.0.trim();
        name.eq_ignore_ascii_case("Executive") || name.eq_ignore_ascii_case("Administration")
    }

    /// Slug used in the department-scoped permission token.
    pub fn permission_slug(&self) -> String {
        self.0
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl core::fmt::Display for DepartmentName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User record
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical directory record, keyed by `email`.
///
/// # Invariants
/// - A record with `sub_role == Ceo` has no manager and `is_manager == true`.
/// - Records are never hard-deleted, only deactivated (`is_active = false`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub staff_id: StaffId,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub base_role: BaseRole,
    pub sub_role: Option<SubRole>,
    pub is_manager: bool,
    /// Email of the record's manager, if any.
    pub manager: Option<Email>,
    pub department_id: DepartmentId,
    pub department: DepartmentName,
    pub assigned_location_id: LocationId,
    pub allowed_location_ids: BTreeSet<LocationId>,
    pub current_location_ids: BTreeSet<LocationId>,
    pub verified: bool,
    pub is_active: bool,
    pub is_clocked_in: bool,
}

impl UserRecord {
    /// Check record-level invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.sub_role == Some(SubRole::Ceo) {
            if self.manager.is_some() {
                return Err(DomainError::invariant("a CEO record cannot have a manager"));
            }
            if !self.is_manager {
                return Err(DomainError::invariant("a CEO record must be a manager"));
            }
        }
        Ok(())
    }

    pub fn is_ceo(&self) -> bool {
        self.sub_role == Some(SubRole::Ceo)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Current-session snapshot: the logged-in record plus the active route.
///
/// The snapshot is a copy of the directory record at login time. A directory
/// write after login does not retroactively update open sessions; the next
/// login picks up the new state (last-write-wins, see the directory port).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserRecord,
    active_route: String,
}

impl Session {
    pub fn new(user: UserRecord, active_route: impl Into<String>) -> Self {
        Self {
            user,
            active_route: active_route.into(),
        }
    }

    pub fn active_route(&self) -> &str {
        &self.active_route
    }

    pub fn set_active_route(&mut self, route: impl Into<String>) {
        self.active_route = route.into();
    }

    /// Whether the active route is under the manager-view prefix.
    pub fn manager_view(&self) -> bool {
        self.active_route.starts_with(routes::MANAGER_PREFIX)
    }
}
