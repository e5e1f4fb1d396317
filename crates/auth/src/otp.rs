//! One-time-code ledger for account verification and password reset.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crewgate_core::{DomainError, Email};

use crate::error::{AuthError, AuthResult};

/// Lifetime of an issued code.
pub const OTP_TTL_MS: i64 = 300_000;

/// What an issued code is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Verification,
    PasswordReset,
}

impl core::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OtpPurpose::Verification => write!(f, "verification"),
            OtpPurpose::PasswordReset => write!(f, "password_reset"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Code
// ─────────────────────────────────────────────────────────────────────────────

/// Six-digit numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation("a code is exactly six digits"));
        }
        Ok(Self(raw.to_string()))
    }

    /// Format a number in `0..1_000_000` as a zero-padded code.
    pub fn from_number(n: u32) -> Self {
        debug_assert!(n < 1_000_000);
        Self(format!("{n:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh codes.
pub trait CodeGenerator {
    fn six_digit_code(&mut self) -> OtpCode;
}

/// Uniformly random codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCode;

impl CodeGenerator for RandomCode {
    fn six_digit_code(&mut self) -> OtpCode {
        use rand::Rng;
        OtpCode::from_number(rand::thread_rng().gen_range(0..1_000_000))
    }
}

/// Deterministic generator for tests.
#[derive(Debug, Clone)]
pub struct FixedCode(pub OtpCode);

impl FixedCode {
    pub fn of(raw: &str) -> Self {
        Self(OtpCode::parse(raw).expect("fixed test code"))
    }
}

impl CodeGenerator for FixedCode {
    fn six_digit_code(&mut self) -> OtpCode {
        self.0.clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger
// ─────────────────────────────────────────────────────────────────────────────

/// A pending code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpEntry {
    pub code: OtpCode,
    pub purpose: OtpPurpose,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

impl OtpEntry {
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// One-slot-per-email code table.
///
/// The slot is keyed by email alone, **not** by purpose: issuing a
/// verification code silently replaces a pending password-reset code and
/// vice versa. That single-slot overwrite is inherited behavior and is kept
/// deliberately; storage per purpose is a product decision this engine does
/// not take on its own.
#[derive(Debug)]
pub struct OtpLedger<G> {
    entries: BTreeMap<Email, OtpEntry>,
    codes: G,
}

impl<G: CodeGenerator> OtpLedger<G> {
    pub fn new(codes: G) -> Self {
        Self {
            entries: BTreeMap::new(),
            codes,
        }
    }

    /// Issue a fresh code, unconditionally replacing any pending entry for
    /// this email regardless of its purpose.
    pub fn issue(&mut self, email: &Email, purpose: OtpPurpose, now: DateTime<Utc>) -> OtpEntry {
        let entry = OtpEntry {
            code: self.codes.six_digit_code(),
            purpose,
            issued_at: now,
            expires_at: now + Duration::milliseconds(OTP_TTL_MS),
            attempts: 0,
        };
        if let Some(previous) = self.entries.insert(email.clone(), entry.clone()) {
            tracing::debug!(%email, replaced = %previous.purpose, issued = %purpose, "replaced pending code");
        } else {
            tracing::debug!(%email, %purpose, "issued code");
        }
        entry
    }

    /// Validate and consume a pending code.
    ///
    /// A purpose mismatch reads as "no code pending" to the calling flow. The
    /// code is compared before expiry so that a wrong guess against an
    /// expired entry still counts as an attempt and reports `OtpInvalid`.
    /// Only a successful validation removes the entry.
    pub fn validate(
        &mut self,
        email: &Email,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        let entry = self.entries.get_mut(email).ok_or(AuthError::OtpNotFound)?;
        if entry.purpose != purpose {
            return Err(AuthError::OtpNotFound);
        }
        if entry.code.as_str() != code {
            entry.attempts += 1;
            tracing::debug!(%email, attempts = entry.attempts, "code mismatch");
            return Err(AuthError::OtpInvalid);
        }
        if entry.expired_at(now) {
            return Err(AuthError::OtpExpired);
        }
        self.entries.remove(email);
        Ok(())
    }

    /// Re-issue a code for an ongoing flow.
    ///
    /// `verified` is the directory's current verification flag for the email;
    /// resending a verification code for an already verified account fails.
    pub fn resend(
        &mut self,
        email: &Email,
        purpose: OtpPurpose,
        verified: bool,
        now: DateTime<Utc>,
    ) -> AuthResult<OtpEntry> {
        if purpose == OtpPurpose::Verification && verified {
            return Err(AuthError::AlreadyVerified);
        }
        Ok(self.issue(email, purpose, now))
    }

    /// The pending entry for an email, if any.
    pub fn pending(&self, email: &Email) -> Option<&OtpEntry> {
        self.entries.get(email)
    }

    /// Snapshot of the whole table, for the persisted active-OTP surface.
    pub fn snapshot(&self) -> &BTreeMap<Email, OtpEntry> {
        &self.entries
    }

    /// Restore the table from a persisted snapshot.
    pub fn restore(&mut self, entries: BTreeMap<Email, OtpEntry>) {
        self.entries = entries;
    }
}
