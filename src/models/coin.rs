use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Extended information for a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub homepage: Option<String>,
    pub subreddit_url: Option<String>,
    pub twitter_screen_name: Option<String>,
    pub market_cap_rank: Option<u32>,
    pub current_price: Option<Decimal>,
    pub price_change_percentage_24h: Option<Decimal>,
    pub price_change_percentage_7d: Option<Decimal>,
    pub price_change_percentage_14d: Option<Decimal>,
    pub price_change_percentage_30d: Option<Decimal>,
    pub price_change_percentage_60d: Option<Decimal>,
    pub price_change_percentage_200d: Option<Decimal>,
    pub price_change_percentage_1y: Option<Decimal>,
}

/// One sample of a price history series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// Whole-market totals in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMarket {
    pub active_cryptocurrencies: u64,
    pub markets: u64,
    pub total_market_cap: Decimal,
    pub total_volume: Decimal,
    pub market_cap_change_percentage_24h: Decimal,
    pub btc_dominance: Option<Decimal>,
    pub eth_dominance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub thumb: Option<String>,
}
