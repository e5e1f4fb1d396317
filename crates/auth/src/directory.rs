//! User directory port.

use std::collections::HashMap;

use crewgate_core::Email;

use crate::user::UserRecord;

/// Canonical mapping of email → record.
///
/// Reads and writes are whole-record snapshots with last-write-wins
/// semantics: there is no compare-and-swap, so two writers racing on the
/// same record silently clobber each other. That matches the single-process,
/// client-local deployment this engine targets; do not rely on the directory
/// for cross-writer coordination.
pub trait UserDirectory {
    fn get(&self, email: &Email) -> Option<UserRecord>;

    /// Insert or replace the record stored under `record.email`.
    fn save(&mut self, record: UserRecord);

    fn contains(&self, email: &Email) -> bool {
        self.get(email).is_some()
    }
}

/// In-memory directory.
///
/// Intended for tests/dev; the persisted directory lives in `crewgate-store`.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    records: HashMap<Email, UserRecord>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut directory = Self::new();
        for record in records {
            directory.save(record);
        }
        directory
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl UserDirectory for InMemoryDirectory {
    fn get(&self, email: &Email) -> Option<UserRecord> {
        self.records.get(email).cloned()
    }

    fn save(&mut self, record: UserRecord) {
        self.records.insert(record.email.clone(), record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::staff_record;

    #[test]
    fn save_replaces_whole_record() {
        let mut directory = InMemoryDirectory::new();
        let mut record = staff_record("dev1@company.com");
        directory.save(record.clone());

        record.is_clocked_in = true;
        directory.save(record.clone());

        assert_eq!(directory.len(), 1);
        let stored = directory.get(&record.email).unwrap();
        assert!(stored.is_clocked_in);
    }

    #[test]
    fn get_misses_unknown_email() {
        let directory = InMemoryDirectory::new();
        let email = Email::parse("nobody@company.com").unwrap();
        assert!(directory.get(&email).is_none());
        assert!(!directory.contains(&email));
    }
}
