//! aroha-sync
//!
//! Optional cloud mirror of assessment records.
//!
//! The local store is the system of record. Every remote operation is
//! best-effort and reports a [`RemoteOutcome`]: callers get `Unavailable`
//! (unconfigured, sync off, signed out) as an ordinary answer, and remote
//! errors never fail a local write.
//!
//! Public API:
//! - [`CloudSync`]: save with push, fetch, merge, remote cleanup, diagnostics
//! - [`MigrationFlow`]: one-time offer to copy local records into
//!   a newly signed-in account

pub mod adapter;
pub mod diagnose;
pub mod error;
pub mod merge;
pub mod migration;
pub mod outcome;
pub mod postgrest;
pub mod remote;

pub use crate::adapter::{CloudSync, SaveOutcome};
pub use crate::diagnose::ConnectionReport;
pub use crate::error::{MigrationError, SyncError};
pub use crate::merge::merge_records;
pub use crate::migration::{MigrationFlow, MigrationReport, MigrationResolution, MigrationState};
pub use crate::outcome::{RemoteOutcome, Unavailable};
pub use crate::postgrest::PostgrestRecords;
pub use crate::remote::{NewRemoteRecord, RemoteRecordRow, RemoteRecordStore};
