//! Seed data used when a surface is loaded for the first time.

use std::collections::BTreeSet;

use crewgate_auth::{BaseRole, DepartmentName, PasswordHash, SubRole, UserRecord};
use crewgate_core::{DepartmentId, Email, LocationId, StaffId};

struct SeedContext {
    hq: LocationId,
    annex: LocationId,
    engineering: DepartmentId,
    executive: DepartmentId,
    administration: DepartmentId,
    site_security: DepartmentId,
}

fn record(
    ctx: &SeedContext,
    email: &str,
    base_role: BaseRole,
    department_id: DepartmentId,
    department: &'static str,
) -> UserRecord {
    UserRecord {
        staff_id: StaffId::new(),
        email: Email::parse(email).expect("seed email"),
        password_hash: PasswordHash::from_raw("password123"),
        base_role,
        sub_role: None,
        is_manager: false,
        manager: None,
        department_id,
        department: DepartmentName::new(department),
        assigned_location_id: ctx.hq,
        allowed_location_ids: BTreeSet::from([ctx.hq]),
        current_location_ids: BTreeSet::new(),
        verified: true,
        is_active: true,
        is_clocked_in: false,
    }
}

/// Development directory seeded on first load of the `all_users` surface.
pub fn seed_users() -> Vec<UserRecord> {
    let ctx = SeedContext {
        hq: LocationId::new(),
        annex: LocationId::new(),
        engineering: DepartmentId::new(),
        executive: DepartmentId::new(),
        administration: DepartmentId::new(),
        site_security: DepartmentId::new(),
    };

    let manager_email = Email::parse("manager1@company.com").expect("seed email");

    let mut dev1 = record(
        &ctx,
        "dev1@company.com",
        BaseRole::Staff,
        ctx.engineering,
        "Engineering",
    );
    dev1.manager = Some(manager_email.clone());

    let mut dev2 = record(
        &ctx,
        "dev2@company.com",
        BaseRole::Staff,
        ctx.engineering,
        "Engineering",
    );
    dev2.verified = false;
    dev2.manager = Some(manager_email);

    let mut manager1 = record(
        &ctx,
        "manager1@company.com",
        BaseRole::Staff,
        ctx.engineering,
        "Engineering",
    );
    manager1.is_manager = true;
    manager1.allowed_location_ids.insert(ctx.annex);

    let admin = record(
        &ctx,
        "admin@company.com",
        BaseRole::Admin,
        ctx.administration,
        "Administration",
    );

    let security = record(
        &ctx,
        "security@company.com",
        BaseRole::Security,
        ctx.site_security,
        "Site Security",
    );

    let mut ceo = record(
        &ctx,
        "ceo@company.com",
        BaseRole::Staff,
        ctx.executive,
        "Executive",
    );
    ceo.sub_role = Some(SubRole::Ceo);
    ceo.is_manager = true;
    ceo.allowed_location_ids.insert(ctx.annex);

    vec![dev1, dev2, manager1, admin, security, ceo]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_records_satisfy_invariants() {
        for user in seed_users() {
            user.validate().expect("seed record invariant");
        }
    }

    #[test]
    fn seed_contains_the_dev_login() {
        let users = seed_users();
        let dev1 = users
            .iter()
            .find(|u| u.email.as_str() == "dev1@company.com")
            .unwrap();
        assert!(dev1.verified);
        assert!(dev1.is_active);
        assert!(dev1.password_hash.matches("password123"));
    }
}
