//! aroha-core
//!
//! Pure domain types and local storage key conventions.
//! No I/O beyond reading an optional resources file. This is the shared
//! vocabulary of the Aroha system.

pub mod error;
pub mod models;
pub mod resources;
pub mod storage_keys;
