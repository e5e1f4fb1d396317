//! Session orchestration: login, logout, verification, password reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crewgate_core::{Clock, Email, StaffId};

use crate::credentials::{update_password, verify_credentials};
use crate::directory::UserDirectory;
use crate::error::{AuthError, AuthResult, RedirectTarget};
use crate::otp::{CodeGenerator, OtpEntry, OtpLedger, OtpPurpose};
use crate::roles::{EffectiveRole, RoleHint, compute_effective_role};
use crate::routes;
use crate::user::Session;

/// Where the session machine currently stands.
///
/// `Authenticating` from the reference flow is transient inside `login` and
/// never observable between calls, so it has no variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// Login succeeded on credentials but the account is unverified; a
    /// verification code is pending for this email.
    AwaitingVerification { email: Email },
    Authenticated(Session),
}

/// Identity stamp the external leave workflow attaches to a processed
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorStamp {
    pub staff_id: StaffId,
    pub email: Email,
    pub role: EffectiveRole,
    pub at: DateTime<Utc>,
}

/// Orchestrates credential checks, the code ledger, and the current-session
/// state machine. Owns the directory handle and the active-OTP table.
#[derive(Debug)]
pub struct SessionManager<D, G, C> {
    directory: D,
    otp: OtpLedger<G>,
    clock: C,
    state: SessionState,
}

impl<D, G, C> SessionManager<D, G, C>
where
    D: UserDirectory,
    G: CodeGenerator,
    C: Clock,
{
    pub fn new(directory: D, codes: G, clock: C) -> Self {
        Self {
            directory,
            otp: OtpLedger::new(codes),
            clock,
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    pub fn otp_ledger(&self) -> &OtpLedger<G> {
        &self.otp
    }

    pub fn otp_ledger_mut(&mut self) -> &mut OtpLedger<G> {
        &mut self.otp
    }

    // ─────────────────────────────────────────────────────────────────────
    // Login / logout
    // ─────────────────────────────────────────────────────────────────────

    /// Attempt a login; on success the session is established and the
    /// role-keyed landing route is returned.
    ///
    /// Check order is fixed: credentials, deactivation, verification (with
    /// the code-issue side effect), then the portal hint. A deactivated
    /// account always fails before any code or role logic runs.
    pub fn login(
        &mut self,
        email: &Email,
        password: &str,
        role_hint: Option<RoleHint>,
    ) -> AuthResult<&'static str> {
        let record = verify_credentials(&self.directory, email, password)?;

        if !record.is_active {
            tracing::warn!(%email, "login rejected: deactivated");
            return Err(AuthError::AccountDeactivated);
        }

        if !record.verified {
            let now = self.clock.now();
            self.otp.issue(email, OtpPurpose::Verification, now);
            self.state = SessionState::AwaitingVerification {
                email: email.clone(),
            };
            tracing::info!(%email, "login deferred: verification pending");
            return Err(AuthError::AccountUnverified {
                redirect: RedirectTarget::with_email(routes::VERIFY, email.clone()),
            });
        }

        if let Some(hint) = role_hint {
            if !hint.matches(&record) {
                tracing::warn!(%email, ?hint, "login rejected: wrong portal");
                return Err(AuthError::WrongPortal);
            }
        }

        let landing = routes::landing(&record);
        tracing::info!(%email, role = %compute_effective_role(&record), landing, "login");
        self.state = SessionState::Authenticated(Session::new(record, landing));
        Ok(landing)
    }

    /// Clear the session and return the anonymous landing route.
    pub fn logout(&mut self) -> &'static str {
        if let Some(session) = self.session() {
            tracing::info!(email = %session.user.email, "logout");
        }
        self.state = SessionState::Anonymous;
        routes::LOGIN
    }

    /// Record a navigation on the authenticated session (manager-view
    /// detection depends on the active route).
    pub fn navigate(&mut self, path: &str) {
        if let SessionState::Authenticated(session) = &mut self.state {
            session.set_active_route(path);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────

    /// Consume a verification code and mark the record verified.
    ///
    /// Success returns the machine to `Anonymous`; the user signs in again
    /// against the now-verified record.
    pub fn verify_account(&mut self, email: &Email, code: &str) -> AuthResult<()> {
        let now = self.clock.now();
        self.otp
            .validate(email, code, OtpPurpose::Verification, now)?;

        let mut record = self.directory.get(email).ok_or(AuthError::NoSuchAccount)?;
        record.verified = true;
        self.directory.save(record);

        if matches!(&self.state, SessionState::AwaitingVerification { email: pending } if pending == email)
        {
            self.state = SessionState::Anonymous;
        }
        tracing::info!(%email, "account verified");
        Ok(())
    }

    /// Re-issue a pending code for an ongoing flow.
    pub fn resend_otp(&mut self, email: &Email, purpose: OtpPurpose) -> AuthResult<OtpEntry> {
        let record = self.directory.get(email).ok_or(AuthError::NoSuchAccount)?;
        let now = self.clock.now();
        self.otp.resend(email, purpose, record.verified, now)
    }

    /// The code currently pending for an email, if any. External delivery
    /// (mail) reads the code from here.
    pub fn pending_otp(&self, email: &Email) -> Option<&OtpEntry> {
        self.otp.pending(email)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Password reset
    // ─────────────────────────────────────────────────────────────────────

    /// Start a reset: issue a password-reset code for a known account.
    pub fn forgot_password(&mut self, email: &Email) -> AuthResult<OtpEntry> {
        if !self.directory.contains(email) {
            return Err(AuthError::NoSuchAccount);
        }
        let now = self.clock.now();
        Ok(self.otp.issue(email, OtpPurpose::PasswordReset, now))
    }

    /// Finish a reset: consume the code, then overwrite the password.
    pub fn reset_password(
        &mut self,
        email: &Email,
        code: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let now = self.clock.now();
        self.otp
            .validate(email, code, OtpPurpose::PasswordReset, now)?;
        update_password(&mut self.directory, email, new_password)?;
        tracing::info!(%email, "password reset");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Hooks for the external clock and leave surfaces
    // ─────────────────────────────────────────────────────────────────────

    /// Flip the directory's clock state for a record. The clock pages own
    /// the activity log; this keeps the directory flag in step.
    pub fn record_clock_state(&mut self, email: &Email, clocked_in: bool) -> AuthResult<()> {
        let mut record = self.directory.get(email).ok_or(AuthError::NoSuchAccount)?;
        record.is_clocked_in = clocked_in;
        self.directory.save(record.clone());

        // Keep the live snapshot in step when it is the same person.
        if let SessionState::Authenticated(session) = &mut self.state {
            if session.user.email == *email {
                session.user = record;
            }
        }
        Ok(())
    }

    /// Identity stamp for the external leave workflow, from the live session.
    pub fn processor_stamp(&self) -> Option<ProcessorStamp> {
        let session = self.session()?;
        Some(ProcessorStamp {
            staff_id: session.user.staff_id,
            email: session.user.email.clone(),
            role: compute_effective_role(&session.user),
            at: self.clock.now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::otp::{FixedCode, OTP_TTL_MS};
    use crate::testing::{admin_record, ceo_record, staff_record};
    use chrono::Duration;
    use crewgate_core::FixedClock;

    type Manager<'a> = SessionManager<InMemoryDirectory, FixedCode, &'a FixedClock>;

    fn manager(clock: &FixedClock) -> Manager<'_> {
        let directory = InMemoryDirectory::with_records([
            staff_record("dev1@company.com"),
            admin_record("admin@company.com"),
            ceo_record("ceo@company.com"),
        ]);
        SessionManager::new(directory, FixedCode::of("123456"), clock)
    }

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    #[test]
    fn login_happy_path_lands_on_the_clock_screen() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let landing = manager
            .login(&email("dev1@company.com"), "password123", Some(RoleHint::Staff))
            .unwrap();

        assert_eq!(landing, routes::STAFF_CLOCK);
        assert!(matches!(manager.state(), SessionState::Authenticated(_)));
    }

    #[test]
    fn login_is_case_insensitive_on_email() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let landing = manager
            .login(&email("  DEV1@Company.com "), "password123", None)
            .unwrap();
        assert_eq!(landing, routes::STAFF_CLOCK);
    }

    #[test]
    fn ceo_lands_on_the_executive_dashboard() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let landing = manager
            .login(&email("ceo@company.com"), "password123", Some(RoleHint::Ceo))
            .unwrap();
        assert_eq!(landing, routes::CEO_DASHBOARD);
    }

    #[test]
    fn wrong_portal_is_rejected_after_verification_checks() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let err = manager
            .login(&email("dev1@company.com"), "password123", Some(RoleHint::Admin))
            .unwrap_err();
        assert_eq!(err, AuthError::WrongPortal);
        assert!(matches!(manager.state(), SessionState::Anonymous));
    }

    #[test]
    fn deactivated_account_fails_before_any_code_logic() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let mut record = staff_record("gone@company.com");
        record.is_active = false;
        record.verified = false; // would otherwise trigger the OTP side effect
        manager.directory_mut().save(record);

        let addr = email("gone@company.com");
        let err = manager.login(&addr, "password123", None).unwrap_err();
        assert_eq!(err, AuthError::AccountDeactivated);
        assert!(manager.pending_otp(&addr).is_none());
    }

    #[test]
    fn unverified_login_issues_a_verification_code() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let mut record = staff_record("new@company.com");
        record.verified = false;
        manager.directory_mut().save(record);

        let addr = email("new@company.com");
        let err = manager.login(&addr, "password123", None).unwrap_err();

        let AuthError::AccountUnverified { redirect } = err else {
            panic!("expected AccountUnverified");
        };
        assert_eq!(redirect.path, routes::VERIFY);
        assert_eq!(redirect.email, Some(addr.clone()));

        let pending = manager.pending_otp(&addr).unwrap();
        assert_eq!(pending.purpose, OtpPurpose::Verification);
        assert_eq!(pending.attempts, 0);
        assert_eq!(pending.code.as_str(), "123456");
        assert_eq!(
            pending.expires_at,
            clock.now() + Duration::milliseconds(OTP_TTL_MS)
        );
        assert!(matches!(
            manager.state(),
            SessionState::AwaitingVerification { .. }
        ));
    }

    #[test]
    fn verify_account_consumes_code_and_marks_verified() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let mut record = staff_record("new@company.com");
        record.verified = false;
        manager.directory_mut().save(record);

        let addr = email("new@company.com");
        let _ = manager.login(&addr, "password123", None);

        manager.verify_account(&addr, "123456").unwrap();
        assert!(matches!(manager.state(), SessionState::Anonymous));
        assert!(manager.directory().get(&addr).unwrap().verified);

        // The account now logs in normally.
        let landing = manager.login(&addr, "password123", None).unwrap();
        assert_eq!(landing, routes::STAFF_CLOCK);
    }

    #[test]
    fn forgot_password_requires_a_known_account() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let err = manager
            .forgot_password(&email("ghost@company.com"))
            .unwrap_err();
        assert_eq!(err, AuthError::NoSuchAccount);
    }

    #[test]
    fn reset_flow_consumes_code_then_overwrites_password() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);
        let addr = email("dev1@company.com");

        let entry = manager.forgot_password(&addr).unwrap();
        assert_eq!(entry.purpose, OtpPurpose::PasswordReset);

        manager.reset_password(&addr, "123456", "hunter2").unwrap();

        assert_eq!(
            manager.login(&addr, "password123", None).unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert!(manager.login(&addr, "hunter2", None).is_ok());
    }

    #[test]
    fn expired_reset_code_is_rejected() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);
        let addr = email("dev1@company.com");

        manager.forgot_password(&addr).unwrap();
        clock.advance(Duration::milliseconds(OTP_TTL_MS + 1));

        assert_eq!(
            manager
                .reset_password(&addr, "123456", "hunter2")
                .unwrap_err(),
            AuthError::OtpExpired
        );
        // Password unchanged.
        assert!(manager.login(&addr, "password123", None).is_ok());
    }

    #[test]
    fn resend_for_verified_account_is_rejected() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);
        let addr = email("dev1@company.com");

        assert_eq!(
            manager
                .resend_otp(&addr, OtpPurpose::Verification)
                .unwrap_err(),
            AuthError::AlreadyVerified
        );
    }

    #[test]
    fn verification_resend_replaces_a_pending_reset_code() {
        // Single slot per email: the reset flow loses its code.
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        let mut record = staff_record("new@company.com");
        record.verified = false;
        manager.directory_mut().save(record);
        let addr = email("new@company.com");

        manager.forgot_password(&addr).unwrap();
        manager
            .resend_otp(&addr, OtpPurpose::Verification)
            .unwrap();

        assert_eq!(
            manager
                .reset_password(&addr, "123456", "hunter2")
                .unwrap_err(),
            AuthError::OtpNotFound
        );
    }

    #[test]
    fn logout_clears_the_session() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);
        let addr = email("dev1@company.com");

        manager.login(&addr, "password123", None).unwrap();
        assert!(manager.session().is_some());

        let landing = manager.logout();
        assert_eq!(landing, routes::LOGIN);
        assert!(manager.session().is_none());
    }

    #[test]
    fn clock_state_updates_directory_and_live_session() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);
        let addr = email("dev1@company.com");

        manager.login(&addr, "password123", None).unwrap();
        manager.record_clock_state(&addr, true).unwrap();

        assert!(manager.directory().get(&addr).unwrap().is_clocked_in);
        assert!(manager.session().unwrap().user.is_clocked_in);
    }

    #[test]
    fn processor_stamp_reflects_the_live_session() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);

        assert!(manager.processor_stamp().is_none());

        manager
            .login(&email("ceo@company.com"), "password123", None)
            .unwrap();
        let stamp = manager.processor_stamp().unwrap();
        assert_eq!(stamp.role, EffectiveRole::Ceo);
        assert_eq!(stamp.email, email("ceo@company.com"));
    }

    #[test]
    fn navigation_updates_manager_view() {
        let clock = FixedClock::at(Utc::now());
        let mut manager = manager(&clock);
        let addr = email("ceo@company.com");

        manager.login(&addr, "password123", None).unwrap();
        assert!(!manager.session().unwrap().manager_view());

        manager.navigate("/manager/team");
        assert!(manager.session().unwrap().manager_view());
    }
}
