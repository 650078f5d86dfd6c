use crate::models::Theme;

use super::{keys, load_or_reset, save_json, Storage, StorageError};

pub fn load_theme(storage: &dyn Storage) -> Theme {
    load_or_reset(storage, keys::THEME)
}

pub fn save_theme(storage: &dyn Storage, theme: Theme) -> Result<(), StorageError> {
    save_json(storage, keys::THEME, &theme)
}

/// Flip the stored theme and return the new value.
pub fn toggle_theme(storage: &dyn Storage) -> Result<Theme, StorageError> {
    let theme = load_theme(storage).toggled();
    save_theme(storage, theme)?;
    tracing::debug!(theme = %theme, "Theme preference saved");
    Ok(theme)
}
