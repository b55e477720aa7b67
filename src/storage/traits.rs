//! Trait abstraction for the key/value cache to enable mocking in tests

use super::StorageError;

/// String-keyed store holding JSON-encoded values
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read a value; `None` when the key was never written
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
