pub mod favorites_repo;
pub mod file_store;
pub mod memory_store;
pub mod portfolio_repo;
pub mod session_repo;
pub mod theme_repo;

pub use file_store::FileStorage;
pub use memory_store::MemoryStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::errors::DashboardError;

/// Record keys, one per independently persisted document.
pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const PORTFOLIO: &str = "portfolio";
    pub const THEME: &str = "theme";
    pub const SESSION: &str = "session";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value persistence port. Each record is a whole JSON document that is
/// read once at startup and rewritten in full on every mutation.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a record. A record that does not decode is reported as
/// `StorageCorrupt`; a missing record is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, DashboardError> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| DashboardError::StorageCorrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

/// Load a record, discarding it and falling back to the default when it is
/// corrupt or unreadable.
pub fn load_or_reset<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match load_json(storage, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e @ DashboardError::StorageCorrupt { .. }) => {
            tracing::warn!(key = key, error = %e, "Discarding corrupt stored record");
            if let Err(e) = storage.remove(key) {
                tracing::error!(key = key, error = %e, "Failed to remove corrupt record");
            }
            T::default()
        }
        Err(e) => {
            tracing::error!(key = key, error = %e, "Failed to read stored record");
            T::default()
        }
    }
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
