//! Keyed-blob store port.

use thiserror::Error;

/// Keys of the persisted surfaces.
pub mod keys {
    pub const ALL_USERS: &str = "all_users";
    pub const ACTIVE_OTPS: &str = "active_otps";
    pub const CURRENT_SESSION: &str = "current_session";
    pub const CLOCK_ACTIVITY: &str = "clock_activity";
    pub const LEAVE_REQUESTS: &str = "leave_requests";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Whole-value blob storage.
///
/// `save` replaces the blob under `key` entirely; `load` returns the last
/// saved value. Implementations do not diff, version, or merge.
pub trait BlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}
