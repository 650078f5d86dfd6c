pub mod fetch_tracker;
pub mod market_refresher;
pub mod portfolio_refresher;
pub mod report;

pub use fetch_tracker::{FetchTicket, FetchTracker};

use crate::models::PortfolioTotals;

/// What happened to a single refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response was applied to the component.
    Applied,
    /// The response arrived after a newer one or after shutdown and was dropped.
    Discarded,
    /// The provider request failed; prior state was kept.
    Failed(String),
}

/// Notifications from the refresh loops to whoever renders the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    MarketRefreshed { quotes: usize },
    MarketRefreshFailed { reason: String },
    PortfolioRevalued(PortfolioTotals),
    PortfolioRevalueFailed { reason: String },
}
