//! Leave-request surface.
//!
//! The approval workflow (balances, CEO auto-approval, etc.) lives outside
//! the core; the engine's only touch point is stamping processor identity
//! onto a request when a manager or executive acts on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crewgate_auth::ProcessorStamp;
use crewgate_core::{Email, StaffId};

use crate::blob::{BlobStore, StoreError, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequestRecord {
    pub request_id: Uuid,
    pub staff_id: StaffId,
    pub email: Email,
    pub submitted_at: DateTime<Utc>,
    pub status: LeaveStatus,
    pub processed_by: Option<ProcessorStamp>,
}

#[derive(Debug)]
pub struct LeaveRequests<S> {
    store: S,
    records: Vec<LeaveRequestRecord>,
}

impl<S: BlobStore> LeaveRequests<S> {
    pub fn open(store: S) -> Result<Self, StoreError> {
        let records = match store.load(keys::LEAVE_REQUESTS)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self { store, records })
    }

    pub fn records(&self) -> &[LeaveRequestRecord] {
        &self.records
    }

    pub fn submit(&mut self, record: LeaveRequestRecord) -> Result<(), StoreError> {
        self.records.push(record);
        self.persist()
    }

    /// Stamp a processed request with the identity of the session that
    /// decided it.
    pub fn stamp(
        &mut self,
        request_id: Uuid,
        status: LeaveStatus,
        stamp: ProcessorStamp,
    ) -> Result<bool, StoreError> {
        let Some(record) = self.records.iter_mut().find(|r| r.request_id == request_id) else {
            return Ok(false);
        };
        record.status = status;
        record.processed_by = Some(stamp);
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store
            .save(keys::LEAVE_REQUESTS, &serde_json::to_string(&self.records)?)
    }
}
