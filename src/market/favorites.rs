use std::sync::Arc;

use crate::storage::{favorites_repo, Storage};

/// Asset identifiers the user starred. Independent of portfolio holdings.
pub struct FavoriteSet {
    storage: Arc<dyn Storage>,
    ids: Vec<String>,
}

impl FavoriteSet {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let mut ids = favorites_repo::load_favorites(storage.as_ref());
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        Self { storage, ids }
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.ids.iter().any(|id| id == asset_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip membership and persist. Returns true if the asset is now a favorite.
    pub fn toggle(&mut self, asset_id: &str) -> bool {
        let now_favorite = if self.contains(asset_id) {
            self.ids.retain(|id| id != asset_id);
            false
        } else {
            self.ids.push(asset_id.to_string());
            true
        };

        if let Err(e) = favorites_repo::save_favorites(self.storage.as_ref(), &self.ids) {
            tracing::error!(error = %e, "Failed to persist favorites");
        }
        tracing::debug!(asset_id = asset_id, favorite = now_favorite, "Favorite toggled");
        now_favorite
    }
}
