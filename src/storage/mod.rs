#[cfg(test)]
mod memory;
mod schema;
mod sqlite;

use anyhow::Result;

#[cfg(test)]
pub(crate) use memory::MemoryStorage;
pub(crate) use sqlite::SqliteStorage;

/// A flat string-keyed store of string blobs.
///
/// Every persisted value in the app lives under one fixed key; callers
/// read and write whole values, never parts of them.
pub(crate) trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}
