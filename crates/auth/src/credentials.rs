//! Credential verification and the reset-flow password overwrite.

use serde::{Deserialize, Serialize};

use crewgate_core::Email;

use crate::directory::UserDirectory;
use crate::error::{AuthError, AuthResult};
use crate::user::UserRecord;

/// Stored credential form.
///
/// Hashing strength is out of scope for this engine; the stored form is
/// opaque here and compared in constant shape via `matches`. Swapping in a
/// real KDF only touches this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn from_raw(raw: &str) -> Self {
        Self(raw.to_string())
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.0 == raw
    }
}

/// Verify a password against the directory.
///
/// A missing record and a wrong password are indistinguishable to the
/// caller: both fail [`AuthError::InvalidCredentials`].
pub fn verify_credentials<D: UserDirectory>(
    directory: &D,
    email: &Email,
    password: &str,
) -> AuthResult<UserRecord> {
    let record = directory.get(email).ok_or(AuthError::InvalidCredentials)?;
    if !record.password_hash.matches(password) {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(record)
}

/// Overwrite the stored password unconditionally.
///
/// Reset flow only: there is no old-password check here. The caller is
/// expected to have consumed a valid password-reset code first.
pub fn update_password<D: UserDirectory>(
    directory: &mut D,
    email: &Email,
    new_password: &str,
) -> AuthResult<()> {
    let mut record = directory.get(email).ok_or(AuthError::NoSuchAccount)?;
    record.password_hash = PasswordHash::from_raw(new_password);
    directory.save(record);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::testing::staff_record;

    #[test]
    fn verify_accepts_matching_password() {
        let record = staff_record("dev1@company.com");
        let email = record.email.clone();
        let directory = InMemoryDirectory::with_records([record]);

        let verified = verify_credentials(&directory, &email, "password123").unwrap();
        assert_eq!(verified.email, email);
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let record = staff_record("dev1@company.com");
        let email = record.email.clone();
        let directory = InMemoryDirectory::with_records([record]);

        let err = verify_credentials(&directory, &email, "wrong").unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn verify_rejects_unknown_email_identically() {
        let directory = InMemoryDirectory::new();
        let email = Email::parse("ghost@company.com").unwrap();

        let err = verify_credentials(&directory, &email, "password123").unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn update_password_overwrites_without_old_password() {
        let record = staff_record("dev1@company.com");
        let email = record.email.clone();
        let mut directory = InMemoryDirectory::with_records([record]);

        update_password(&mut directory, &email, "hunter2").unwrap();

        assert!(verify_credentials(&directory, &email, "password123").is_err());
        assert!(verify_credentials(&directory, &email, "hunter2").is_ok());
    }

    #[test]
    fn update_password_requires_existing_account() {
        let mut directory = InMemoryDirectory::new();
        let email = Email::parse("ghost@company.com").unwrap();

        let err = update_password(&mut directory, &email, "hunter2").unwrap_err();
        assert_eq!(err, AuthError::NoSuchAccount);
    }
}
