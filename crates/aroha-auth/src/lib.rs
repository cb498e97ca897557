//! aroha-auth
//!
//! Authentication collaborator. Supabase GoTrue sign-in/sign-up/sign-out
//! over HTTPS, with the session persisted in the local key-value store.
//! Callers only ever see "a session" or "no session".

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod session;
pub mod supabase;

pub use crate::config::SupabaseConfig;
pub use crate::error::AuthError;
pub use crate::provider::{AuthProvider, BoxFuture, SignedOut};
pub use crate::session::{AuthUser, Session};
pub use crate::supabase::SupabaseAuth;
