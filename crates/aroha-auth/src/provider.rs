use std::future::Future;
use std::pin::Pin;

use crate::error::AuthError;
use crate::session::Session;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of the current authenticated session.
///
/// "No session" is an ordinary answer, never an error: signed out, expired
/// beyond refresh and auth service unreachable all read as `None`.
pub trait AuthProvider: Send + Sync {
    fn current_session(&self) -> BoxFuture<'_, Option<Session>>;

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthError>>;
}

/// Provider used when no remote backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignedOut;

impl AuthProvider for SignedOut {
    fn current_session(&self) -> BoxFuture<'_, Option<Session>> {
        Box::pin(async { None })
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async { Ok(()) })
    }
}
