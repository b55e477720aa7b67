//! Persistence port for session state
//!
//! The controller only sees [`KeyValueStore`]; the binary picks the
//! JSON file backend or, with persistence disabled, the in-memory one.

mod file_store;
mod memory_store;
mod traits;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use traits::KeyValueStore;

#[cfg(test)]
pub use traits::MockKeyValueStore;

use thiserror::Error;

/// Last selected form type, stored as a plain string
pub const FORM_TYPE_KEY: &str = "formType";
/// Submitted entries, stored as a JSON object keyed by form type
pub const SUBMITTED_DATA_KEY: &str = "submittedData";
/// Whether the entries table is showing, stored as a JSON boolean
pub const SHOW_TABLE_KEY: &str = "showTable";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
