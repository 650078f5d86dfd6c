use crate::coingecko::FetchError;
use crate::storage::StorageError;

/// Failures surfaced by the dashboard components.
///
/// None of these are fatal: fetch failures degrade the display, rejected
/// mutations leave prior state untouched and corrupt records are reset.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Fetch failed: {0}")]
    FetchFailure(#[from] FetchError),

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stored {key} record is corrupt: {reason}")]
    StorageCorrupt { key: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DashboardError {
    /// Short message suitable for an inline notice next to the form or table.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::FetchFailure(_) => {
                "Market data is temporarily unavailable. Showing the last known prices.".into()
            }
            DashboardError::UnknownAsset(id) => format!("Selected cryptocurrency '{id}' not found."),
            DashboardError::InvalidInput(msg) => msg.clone(),
            DashboardError::StorageCorrupt { key, .. } => {
                format!("Saved {key} data could not be read and was reset.")
            }
            DashboardError::Storage(_) => "Local data could not be saved.".into(),
        }
    }
}
