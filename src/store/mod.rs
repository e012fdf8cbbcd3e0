//! Account, session and budget records kept as JSON blobs in a [`Storage`].
//!
//! Every operation reads the whole blob it needs, changes it in memory and
//! writes it back. Storage and (de)serialization failures never reach the
//! caller: they are logged and the operation falls back to an empty value
//! or does nothing.

mod accounts;
mod budgets;
mod session;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::storage::Storage;

pub(crate) const USERS_KEY: &str = "saiel_users";
pub(crate) const CURRENT_USER_KEY: &str = "saiel_current_user";
pub(crate) const BUDGETS_KEY: &str = "saiel_budgets";

pub(crate) struct LocalStore<S: Storage> {
    storage: S,
}

impl<S: Storage> LocalStore<S> {
    pub(crate) fn new(storage: S) -> Self {
        Self { storage }
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Clear accounts, session and budgets.
    pub(crate) fn reset_all(&mut self) {
        for key in [USERS_KEY, CURRENT_USER_KEY, BUDGETS_KEY] {
            self.remove_blob(key);
        }
        info!("all user data has been reset");
    }

    fn read_blob<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read from storage");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed stored value");
                None
            }
        }
    }

    fn write_blob<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize value");
                return;
            }
        };
        if let Err(e) = self.storage.set(key, &raw) {
            warn!(key, error = %e, "failed to write to storage");
        }
    }

    fn remove_blob(&mut self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "failed to remove from storage");
        }
    }
}
