//! aroha-storage
//!
//! Local persistence. A flat, namespaced key-value store (file-backed or
//! in-memory) and the typed record store built on top of it. The local
//! store is the system of record; nothing here talks to the network.

pub mod consent;
pub mod error;
pub mod export;
pub mod kv;
pub mod local;

pub use crate::error::StorageError;
pub use crate::kv::{FileStore, KeyValueStore, MemoryStore};
pub use crate::local::LocalStore;
