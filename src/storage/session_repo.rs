use crate::errors::DashboardError;
use crate::models::Session;

use super::{keys, load_json, save_json, Storage, StorageError};

/// Read the persisted session. Corrupt records are reported, not reset, so
/// the auth provider can log the discard itself.
pub fn load_session(storage: &dyn Storage) -> Result<Option<Session>, DashboardError> {
    load_json(storage, keys::SESSION)
}

pub fn save_session(storage: &dyn Storage, session: &Session) -> Result<(), StorageError> {
    save_json(storage, keys::SESSION, session)
}

pub fn clear_session(storage: &dyn Storage) -> Result<(), StorageError> {
    storage.remove(keys::SESSION)
}
