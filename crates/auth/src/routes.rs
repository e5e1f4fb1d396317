//! Route constants and the role-keyed landing table.

use crate::user::{BaseRole, UserRecord};

pub const LOGIN: &str = "/login";
pub const VERIFY: &str = "/verify";
pub const UNAUTHORIZED: &str = "/unauthorized";

pub const STAFF_CLOCK: &str = "/staff/clock";
pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
pub const SECURITY_DASHBOARD: &str = "/security/dashboard";
pub const CEO_DASHBOARD: &str = "/ceo/dashboard";

/// Prefix marking manager-view pages.
pub const MANAGER_PREFIX: &str = "/manager";

/// Landing route for a record after login (and for role-appropriate
/// redirects on a denied navigation).
///
/// The CEO sub-role wins over the base role: a CEO lands on the executive
/// dashboard even though the stored base role is `staff`.
pub fn landing(record: &UserRecord) -> &'static str {
    if record.is_ceo() {
        return CEO_DASHBOARD;
    }
    match record.base_role {
        BaseRole::Staff => STAFF_CLOCK,
        BaseRole::Admin => ADMIN_DASHBOARD,
        BaseRole::Security => SECURITY_DASHBOARD,
    }
}
