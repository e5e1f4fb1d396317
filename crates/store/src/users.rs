//! Persisted `all_users` surface: the directory behind the auth engine.

use std::collections::BTreeMap;

use crewgate_auth::{UserDirectory, UserRecord};
use crewgate_core::Email;

use crate::blob::{BlobStore, StoreError, keys};
use crate::seed::seed_users;

/// Directory backed by the `all_users` blob.
///
/// The whole map is loaded once at open (seeding the blob if it is absent)
/// and rewritten in full on every save. Persistence failures on save are
/// logged, not raised: the in-process copy stays authoritative for the rest
/// of the run, matching the snapshot/last-write-wins model.
#[derive(Debug)]
pub struct BlobDirectory<S> {
    store: S,
    records: BTreeMap<Email, UserRecord>,
}

impl<S: BlobStore> BlobDirectory<S> {
    /// Load the directory, falling back to seed data on first open.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let records = match store.load(keys::ALL_USERS)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => {
                tracing::info!("all_users surface empty, seeding");
                let records: BTreeMap<Email, UserRecord> = seed_users()
                    .into_iter()
                    .map(|u| (u.email.clone(), u))
                    .collect();
                store.save(keys::ALL_USERS, &serde_json::to_string(&records)?)?;
                records
            }
        };
        Ok(Self { store, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &UserRecord> {
        self.records.values()
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.records)
            .map_err(StoreError::from)
            .and_then(|raw| self.store.save(keys::ALL_USERS, &raw));
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to persist all_users");
        }
    }
}

impl<S: BlobStore> UserDirectory for BlobDirectory<S> {
    fn get(&self, email: &Email) -> Option<UserRecord> {
        self.records.get(email).cloned()
    }

    fn save(&mut self, record: UserRecord) {
        self.records.insert(record.email.clone(), record);
        self.persist();
    }
}
