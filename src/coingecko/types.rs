use std::collections::HashMap;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{CoinDetail, GlobalMarket, PricePoint, TrendingCoin};

const USD: &str = "usd";

// ---------------------------------------------------------------------------
// Coin detail (/coins/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDescription {
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiLinks {
    #[serde(default)]
    pub homepage: Vec<String>,
    #[serde(default)]
    pub subreddit_url: Option<String>,
    #[serde(default)]
    pub twitter_screen_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMarketData {
    /// Price keyed by quote currency; only `usd` is read.
    #[serde(default)]
    pub current_price: HashMap<String, Decimal>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_14d: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_60d: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_200d: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_1y: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: ApiDescription,
    #[serde(default)]
    pub links: ApiLinks,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: Option<ApiMarketData>,
}

impl From<ApiCoinDetail> for CoinDetail {
    fn from(api: ApiCoinDetail) -> Self {
        let market = api.market_data.unwrap_or_default();
        let homepage = api
            .links
            .homepage
            .into_iter()
            .find(|url| !url.trim().is_empty());
        let subreddit_url = api.links.subreddit_url.filter(|s| !s.is_empty());
        let twitter_screen_name = api.links.twitter_screen_name.filter(|s| !s.is_empty());

        CoinDetail {
            id: api.id,
            symbol: api.symbol,
            name: api.name,
            description: api.description.en.unwrap_or_default(),
            homepage,
            subreddit_url,
            twitter_screen_name,
            market_cap_rank: api.market_cap_rank,
            current_price: market.current_price.get(USD).copied(),
            price_change_percentage_24h: market.price_change_percentage_24h,
            price_change_percentage_7d: market.price_change_percentage_7d,
            price_change_percentage_14d: market.price_change_percentage_14d,
            price_change_percentage_30d: market.price_change_percentage_30d,
            price_change_percentage_60d: market.price_change_percentage_60d,
            price_change_percentage_200d: market.price_change_percentage_200d,
            price_change_percentage_1y: market.price_change_percentage_1y,
        }
    }
}

// ---------------------------------------------------------------------------
// Price history (/coins/{id}/market_chart)
// ---------------------------------------------------------------------------

/// `prices` is a list of `[unix_millis, price]` pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMarketChart {
    #[serde(default)]
    pub prices: Vec<(f64, Decimal)>,
}

impl ApiMarketChart {
    /// Convert to price points, skipping samples with unrepresentable timestamps.
    pub fn into_points(self) -> Vec<PricePoint> {
        self.prices
            .into_iter()
            .filter_map(|(millis, price)| {
                DateTime::from_timestamp_millis(millis as i64)
                    .map(|timestamp| PricePoint { timestamp, price })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Global market (/global)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGlobalData {
    #[serde(default)]
    pub active_cryptocurrencies: u64,
    #[serde(default)]
    pub markets: u64,
    #[serde(default)]
    pub total_market_cap: HashMap<String, Decimal>,
    #[serde(default)]
    pub total_volume: HashMap<String, Decimal>,
    #[serde(default)]
    pub market_cap_percentage: HashMap<String, Decimal>,
    #[serde(default)]
    pub market_cap_change_percentage_24h_usd: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGlobal {
    pub data: ApiGlobalData,
}

impl From<ApiGlobal> for GlobalMarket {
    fn from(api: ApiGlobal) -> Self {
        let data = api.data;
        GlobalMarket {
            active_cryptocurrencies: data.active_cryptocurrencies,
            markets: data.markets,
            total_market_cap: data.total_market_cap.get(USD).copied().unwrap_or_default(),
            total_volume: data.total_volume.get(USD).copied().unwrap_or_default(),
            market_cap_change_percentage_24h: data
                .market_cap_change_percentage_24h_usd
                .unwrap_or_default(),
            btc_dominance: data.market_cap_percentage.get("btc").copied(),
            eth_dominance: data.market_cap_percentage.get("eth").copied(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trending (/search/trending)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrendingItem {
    pub item: ApiTrendingCoin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrending {
    #[serde(default)]
    pub coins: Vec<ApiTrendingItem>,
}

impl ApiTrending {
    pub fn into_coins(self) -> Vec<TrendingCoin> {
        self.coins
            .into_iter()
            .map(|entry| TrendingCoin {
                id: entry.item.id,
                name: entry.item.name,
                symbol: entry.item.symbol,
                market_cap_rank: entry.item.market_cap_rank,
                thumb: entry.item.thumb,
            })
            .collect()
    }
}
