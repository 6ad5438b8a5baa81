//! Shared bearer-token handle.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::SecretString;

/// A shared cell holding the current bearer token.
///
/// The session store writes it on login/logout; the API client reads it
/// per request - the same shape as the original request interceptor, but
/// with the ownership explicit. Cloning the cell clones the handle, not
/// the token.
#[derive(Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<SecretString>>>,
}

impl TokenCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new token.
    pub fn set(&self, token: SecretString) {
        *self.write() = Some(token);
    }

    /// Drop the current token.
    pub fn clear(&self) {
        *self.write() = None;
    }

    /// The current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SecretString>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SecretString>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TokenCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCell")
            .field("token", &self.read().as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
