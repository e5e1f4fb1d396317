//! Shared record builders for unit tests.

use std::collections::BTreeSet;

use crewgate_core::{DepartmentId, Email, LocationId, StaffId};

use crate::credentials::PasswordHash;
use crate::user::{BaseRole, DepartmentName, SubRole, UserRecord};

/// A verified, active staff record with a single allowed location.
pub fn staff_record(email: &str) -> UserRecord {
    let location = LocationId::new();
    UserRecord {
        staff_id: StaffId::new(),
        email: Email::parse(email).unwrap(),
        password_hash: PasswordHash::from_raw("password123"),
        base_role: BaseRole::Staff,
        sub_role: None,
        is_manager: false,
        manager: None,
        department_id: DepartmentId::new(),
        department: DepartmentName::new("Engineering"),
        assigned_location_id: location,
        allowed_location_ids: BTreeSet::from([location]),
        current_location_ids: BTreeSet::new(),
        verified: true,
        is_active: true,
        is_clocked_in: false,
    }
}

pub fn admin_record(email: &str) -> UserRecord {
    UserRecord {
        base_role: BaseRole::Admin,
        department: DepartmentName::new("Administration"),
        ..staff_record(email)
    }
}

pub fn security_record(email: &str) -> UserRecord {
    UserRecord {
        base_role: BaseRole::Security,
        department: DepartmentName::new("Site Security"),
        ..staff_record(email)
    }
}

pub fn manager_record(email: &str) -> UserRecord {
    UserRecord {
        is_manager: true,
        ..staff_record(email)
    }
}

pub fn ceo_record(email: &str) -> UserRecord {
    UserRecord {
        sub_role: Some(SubRole::Ceo),
        is_manager: true,
        manager: None,
        department: DepartmentName::new("Executive"),
        ..staff_record(email)
    }
}
