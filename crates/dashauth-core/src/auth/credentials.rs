use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use super::storage::TokenStorage;
use crate::utils::mask_token;

/// Owns the dashboard bearer token.
///
/// The persisted value is read once at construction and served from memory
/// afterwards. Writes go through to the storage backend; a backend failure is
/// logged and the in-memory value stays authoritative for this process.
pub struct CredentialStore {
    storage: Box<dyn TokenStorage>,
    token: Mutex<Option<String>>,
}

impl CredentialStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(backend = storage.name(), error = %e, "Failed to load stored token");
                None
            }
        };
        debug!(backend = storage.name(), present = token.is_some(), "Credential store opened");

        Self {
            storage,
            token: Mutex::new(token),
        }
    }

    /// Current token, if any
    pub fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    /// Store and persist a token
    pub fn set(&self, token: &str) {
        *self.slot() = Some(token.to_string());
        if let Err(e) = self.storage.save(token) {
            warn!(
                backend = self.storage.name(),
                token = %mask_token(token),
                error = %e,
                "Failed to persist token, keeping it in memory only"
            );
        }
    }

    /// Forget the token, in memory and in storage
    pub fn clear(&self) {
        *self.slot() = None;
        if let Err(e) = self.storage.remove() {
            warn!(backend = self.storage.name(), error = %e, "Failed to remove stored token");
        }
    }

    pub fn has_token(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}
