pub mod auth;
pub mod coingecko;
pub mod config;
pub mod errors;
pub mod format;
pub mod market;
pub mod models;
pub mod portfolio;
pub mod services;
pub mod storage;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::{AuthProvider, LocalAuthProvider, SessionSigner};
use crate::coingecko::QuoteProvider;
use crate::config::AppConfig;
use crate::errors::DashboardError;
use crate::market::MarketView;
use crate::models::{CoinDetail, Position, PricePoint, Theme};
use crate::portfolio::{PortfolioLedger, PurchaseRequest};
use crate::services::FetchTracker;
use crate::storage::{theme_repo, Storage, StorageError};

/// Everything the dashboard owns, shared between the refresh loops and
/// user actions.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn Storage>,
    pub provider: Arc<dyn QuoteProvider>,
    pub auth: Arc<dyn AuthProvider>,
    pub market: Arc<Mutex<MarketView>>,
    pub ledger: Arc<Mutex<PortfolioLedger>>,
    pub market_tracker: Arc<FetchTracker>,
    pub portfolio_tracker: Arc<FetchTracker>,
}

impl AppState {
    /// Restore persisted state and apply the configured initial table view.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn Storage>,
        provider: Arc<dyn QuoteProvider>,
    ) -> Self {
        let mut market = MarketView::new(storage.clone());
        market.sort(config.default_sort, config.default_sort_direction);
        if !config.default_search.is_empty() {
            market.filter(&config.default_search);
        }

        let ledger = PortfolioLedger::load(storage.clone());
        let auth = LocalAuthProvider::new(storage.clone(), SessionSigner::new(&config.auth_secret));

        Self {
            config,
            storage,
            provider,
            auth: Arc::new(auth),
            market: Arc::new(Mutex::new(market)),
            ledger: Arc::new(Mutex::new(ledger)),
            market_tracker: Arc::new(FetchTracker::new("market")),
            portfolio_tracker: Arc::new(FetchTracker::new("portfolio")),
        }
    }

    /// Record a purchase from raw form input against the current listing.
    pub async fn add_purchase(
        &self,
        asset_id: &str,
        quantity: &str,
        price: &str,
    ) -> Result<Position, DashboardError> {
        let request = PurchaseRequest::parse(asset_id, quantity, price)?;
        let quote = self.market.lock().await.quote(&request.asset_id).cloned();
        self.ledger.lock().await.record(quote.as_ref(), &request)
    }

    pub async fn remove_position(&self, asset_id: &str) -> bool {
        self.ledger.lock().await.remove_position(asset_id)
    }

    pub async fn toggle_favorite(&self, asset_id: &str) -> bool {
        self.market.lock().await.toggle_favorite(asset_id)
    }

    pub fn theme(&self) -> Theme {
        theme_repo::load_theme(self.storage.as_ref())
    }

    pub fn toggle_theme(&self) -> Result<Theme, StorageError> {
        theme_repo::toggle_theme(self.storage.as_ref())
    }

    /// Detail and price history for one asset, fetched concurrently.
    pub async fn coin_overview(
        &self,
        asset_id: &str,
    ) -> Result<(CoinDetail, Vec<PricePoint>), DashboardError> {
        let (detail, history) = tokio::join!(
            self.provider.coin_detail(asset_id),
            self.provider
                .price_history(asset_id, self.config.price_history_days),
        );
        Ok((detail?, history?))
    }

    /// Stop the refresh loops; responses still in flight are dropped.
    pub fn shutdown(&self) {
        self.market_tracker.shutdown();
        self.portfolio_tracker.shutdown();
    }
}
