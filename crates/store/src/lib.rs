//! `crewgate-store` — keyed-blob persistence for the auth engine.
//!
//! Every surface is an independent keyed blob, loaded once at startup (with
//! a seed-data fallback) and rewritten in full on every mutation. There is
//! no batching, no diffing, and no cross-writer coordination: writes are
//! last-write-wins, as the single-process deployment expects.

pub mod activity;
pub mod blob;
pub mod fs;
pub mod in_memory;
pub mod leave;
pub mod otp;
pub mod seed;
pub mod session;
pub mod users;


pub use activity::{ClockAction, ClockActivityEntry, ClockActivityLog};
pub use blob::{BlobStore, StoreError, keys};
pub use fs::JsonFileStore;
pub use in_memory::InMemoryBlobStore;
pub use leave::{LeaveRequestRecord, LeaveRequests, LeaveStatus};
pub use otp::{load_otp_table, save_otp_table};
pub use session::SessionSnapshot;
pub use users::BlobDirectory;
