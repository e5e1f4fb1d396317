//! Email value object: the canonical key of the user directory.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Normalized email address.
///
/// Construction trims and lowercases, so two spellings of the same address
/// always collide on the same directory slot. Validation is intentionally
/// shallow (non-empty, contains `@`); deliverability is not a domain concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() || !normalized.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Dev1@Company.COM ").unwrap();
        assert_eq!(email.as_str(), "dev1@company.com");
    }

    #[test]
    fn parse_rejects_missing_at_sign() {
        assert!(Email::parse("not-an-email").is_err());
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(Email::parse("   ").is_err());
    }

    #[test]
    fn equal_after_normalization() {
        let a = Email::parse("A@b.c").unwrap();
        let b = Email::parse("a@B.C").unwrap();
        assert_eq!(a, b);
    }
}
