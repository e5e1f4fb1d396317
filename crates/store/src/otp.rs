//! Persistence for the active-OTP table.
//!
//! The ledger in `crewgate-auth` owns the table exclusively; this module
//! only moves its snapshot in and out of the `active_otps` blob.

use std::collections::BTreeMap;

use crewgate_auth::OtpEntry;
use crewgate_core::Email;

use crate::blob::{BlobStore, StoreError, keys};

pub fn load_otp_table<S: BlobStore>(store: &S) -> Result<BTreeMap<Email, OtpEntry>, StoreError> {
    match store.load(keys::ACTIVE_OTPS)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(BTreeMap::new()),
    }
}

pub fn save_otp_table<S: BlobStore>(
    store: &S,
    table: &BTreeMap<Email, OtpEntry>,
) -> Result<(), StoreError> {
    store.save(keys::ACTIVE_OTPS, &serde_json::to_string(table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryBlobStore;
    use chrono::Utc;
    use crewgate_auth::{FixedCode, OtpLedger, OtpPurpose};

    #[test]
    fn table_round_trips_through_the_blob() {
        let store = InMemoryBlobStore::new();
        let email = Email::parse("a@b.c").unwrap();

        let mut ledger = OtpLedger::new(FixedCode::of("123456"));
        let now = Utc::now();
        ledger.issue(&email, OtpPurpose::Verification, now);
        save_otp_table(&store, ledger.snapshot()).unwrap();

        let mut restored = OtpLedger::new(FixedCode::of("123456"));
        restored.restore(load_otp_table(&store).unwrap());
        assert!(
            restored
                .validate(&email, "123456", OtpPurpose::Verification, now)
                .is_ok()
        );
    }

    #[test]
    fn missing_blob_loads_an_empty_table() {
        let store = InMemoryBlobStore::new();
        assert!(load_otp_table(&store).unwrap().is_empty());
    }
}
