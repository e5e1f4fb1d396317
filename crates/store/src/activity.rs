//! Clock-activity log surface.
//!
//! The clock pages own what gets logged; this surface only guarantees the
//! entries carry a `StaffId` that exists in the directory and that the log
//! persists as one whole-value blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crewgate_auth::UserDirectory;
use crewgate_core::{Email, LocationId, StaffId};

use crate::blob::{BlobStore, StoreError, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockActivityEntry {
    pub staff_id: StaffId,
    pub email: Email,
    pub action: ClockAction,
    pub location_id: LocationId,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ClockActivityLog<S> {
    store: S,
    entries: Vec<ClockActivityEntry>,
}

impl<S: BlobStore> ClockActivityLog<S> {
    pub fn open(store: S) -> Result<Self, StoreError> {
        let entries = match store.load(keys::CLOCK_ACTIVITY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self { store, entries })
    }

    /// Append an entry after checking its staff identity against the
    /// directory, then rewrite the whole log.
    pub fn append<D: UserDirectory>(
        &mut self,
        directory: &D,
        entry: ClockActivityEntry,
    ) -> Result<(), StoreError> {
        match directory.get(&entry.email) {
            Some(record) if record.staff_id == entry.staff_id => {}
            _ => {
                tracing::warn!(email = %entry.email, "dropping clock entry with unknown identity");
                return Ok(());
            }
        }
        self.entries.push(entry);
        self.store
            .save(keys::CLOCK_ACTIVITY, &serde_json::to_string(&self.entries)?)
    }

    pub fn entries(&self) -> &[ClockActivityEntry] {
        &self.entries
    }
}
