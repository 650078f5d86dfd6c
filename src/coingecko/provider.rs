use async_trait::async_trait;

use crate::models::{AssetQuote, CoinDetail, GlobalMarket, PricePoint, TrendingCoin};

use super::FetchError;

/// Read-only source of market data. The dashboard never writes upstream;
/// every call is an independent request whose failure is a `FetchError`.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Top `per_page` assets ordered by market capitalization.
    async fn top_coins(&self, per_page: u32) -> Result<Vec<AssetQuote>, FetchError>;

    /// Quotes for exactly the given identifiers (unknown ids are omitted).
    async fn quotes_for(&self, ids: &[String]) -> Result<Vec<AssetQuote>, FetchError>;

    async fn coin_detail(&self, id: &str) -> Result<CoinDetail, FetchError>;

    /// Price samples for the last `days` days, oldest first.
    async fn price_history(&self, id: &str, days: u32) -> Result<Vec<PricePoint>, FetchError>;

    async fn global_market(&self) -> Result<GlobalMarket, FetchError>;

    async fn trending(&self) -> Result<Vec<TrendingCoin>, FetchError>;
}
