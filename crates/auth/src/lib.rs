//! `crewgate-auth` — identity, session, one-time-code, and authorization engine.
//!
//! This crate is intentionally decoupled from rendering and storage. Storage
//! is reached only through the [`UserDirectory`] port; time only through
//! [`crewgate_core::Clock`]; randomness only through [`CodeGenerator`].

pub mod credentials;
pub mod directory;
pub mod error;
pub mod guard;
pub mod otp;
pub mod permissions;
pub mod roles;
pub mod routes;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use credentials::{PasswordHash, update_password, verify_credentials};
pub use directory::{InMemoryDirectory, UserDirectory};
pub use error::{AuthError, AuthResult, RedirectTarget};
pub use guard::{AccessGuard, Decision, DenyReason, RequiredRole};
pub use otp::{CodeGenerator, FixedCode, OtpCode, OtpEntry, OtpLedger, OtpPurpose, RandomCode};
pub use permissions::{Permission, compute_permissions};
pub use roles::{EffectiveRole, RoleHint, compute_effective_role};
pub use session::{ProcessorStamp, SessionManager, SessionState};
pub use user::{BaseRole, DepartmentName, Session, SubRole, UserRecord};
