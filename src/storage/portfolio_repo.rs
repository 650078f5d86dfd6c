use crate::models::Position;

use super::{keys, load_or_reset, save_json, Storage, StorageError};

/// Restore the saved ledger. A corrupt record is discarded and yields an
/// empty ledger.
pub fn load_positions(storage: &dyn Storage) -> Vec<Position> {
    load_or_reset(storage, keys::PORTFOLIO)
}

/// Rewrite the whole ledger record.
pub fn save_positions(storage: &dyn Storage, positions: &[Position]) -> Result<(), StorageError> {
    save_json(storage, keys::PORTFOLIO, positions)
}
