use super::{keys, load_or_reset, save_json, Storage, StorageError};

pub fn load_favorites(storage: &dyn Storage) -> Vec<String> {
    load_or_reset(storage, keys::FAVORITES)
}

pub fn save_favorites(storage: &dyn Storage, ids: &[String]) -> Result<(), StorageError> {
    save_json(storage, keys::FAVORITES, ids)
}
