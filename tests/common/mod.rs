use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use coinboard::coingecko::{FetchError, QuoteProvider};
use coinboard::config::AppConfig;
use coinboard::models::{AssetQuote, CoinDetail, GlobalMarket, PricePoint, TrendingCoin};
use coinboard::storage::MemoryStorage;
use coinboard::AppState;

/// Build a quote with the columns the table sorts on.
#[allow(dead_code)]
pub fn quote(id: &str, name: &str, symbol: &str, rank: u32, price: Decimal) -> AssetQuote {
    AssetQuote {
        id: id.into(),
        symbol: symbol.into(),
        name: name.into(),
        image: Some(format!("https://img.example/{id}.png")),
        current_price: Some(price),
        price_change_percentage_24h: Some(Decimal::ZERO),
        market_cap: Some(price * Decimal::from(1_000)),
        total_volume: Some(Decimal::from(rank) * Decimal::from(10)),
        circulating_supply: Some(Decimal::from(1_000)),
        market_cap_rank: Some(rank),
        high_24h: None,
        low_24h: None,
        last_updated: None,
    }
}

#[allow(dead_code)]
pub fn sample_listing() -> Vec<AssetQuote> {
    vec![
        quote("bitcoin", "Bitcoin", "btc", 1, Decimal::from(60_000)),
        quote("ethereum", "Ethereum", "eth", 2, Decimal::from(3_000)),
        quote("tether", "Tether", "usdt", 3, Decimal::ONE),
        quote("x", "Asset X", "x", 4, Decimal::from(100)),
        quote("ethereum-classic", "Ethereum Classic", "etc", 5, Decimal::from(25)),
    ]
}

/// Scripted quote provider. Listing and price responses can be switched
/// between success and failure between calls.
#[derive(Default)]
pub struct FakeProvider {
    listing: Mutex<Option<Result<Vec<AssetQuote>, String>>>,
    prices: Mutex<HashMap<String, Decimal>>,
    prices_fail: Mutex<Option<String>>,
    pub listing_calls: AtomicUsize,
    pub requested_ids: Mutex<Vec<Vec<String>>>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(quotes: Vec<AssetQuote>) -> Self {
        let provider = Self::new();
        provider.set_listing(quotes);
        provider
    }

    pub fn set_listing(&self, quotes: Vec<AssetQuote>) {
        *self.listing.lock().unwrap() = Some(Ok(quotes));
    }

    pub fn fail_listing(&self, reason: &str) {
        *self.listing.lock().unwrap() = Some(Err(reason.into()));
    }

    pub fn set_price(&self, id: &str, price: Decimal) {
        self.prices.lock().unwrap().insert(id.into(), price);
    }

    pub fn fail_prices(&self, reason: Option<&str>) {
        *self.prices_fail.lock().unwrap() = reason.map(String::from);
    }
}

#[async_trait]
impl QuoteProvider for FakeProvider {
    async fn top_coins(&self, per_page: u32) -> Result<Vec<AssetQuote>, FetchError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        match self.listing.lock().unwrap().clone() {
            Some(Ok(quotes)) => Ok(quotes.into_iter().take(per_page as usize).collect()),
            Some(Err(reason)) => Err(FetchError::Unexpected(reason)),
            None => Ok(Vec::new()),
        }
    }

    async fn quotes_for(&self, ids: &[String]) -> Result<Vec<AssetQuote>, FetchError> {
        self.requested_ids.lock().unwrap().push(ids.to_vec());
        if let Some(reason) = self.prices_fail.lock().unwrap().clone() {
            return Err(FetchError::Unexpected(reason));
        }
        let prices = self.prices.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| {
                prices
                    .get(id)
                    .map(|p| quote(id, id, id, 1, *p))
            })
            .collect())
    }

    async fn coin_detail(&self, id: &str) -> Result<CoinDetail, FetchError> {
        if id == "missing" {
            return Err(FetchError::Unexpected("404 Not Found".into()));
        }
        Ok(CoinDetail {
            id: id.into(),
            symbol: id.into(),
            name: id.into(),
            description: format!("About {id}"),
            homepage: None,
            subreddit_url: None,
            twitter_screen_name: None,
            market_cap_rank: Some(1),
            current_price: self.prices.lock().unwrap().get(id).copied(),
            price_change_percentage_24h: None,
            price_change_percentage_7d: None,
            price_change_percentage_14d: None,
            price_change_percentage_30d: None,
            price_change_percentage_60d: None,
            price_change_percentage_200d: None,
            price_change_percentage_1y: None,
        })
    }

    async fn price_history(&self, _id: &str, days: u32) -> Result<Vec<PricePoint>, FetchError> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Ok((0..days)
            .map(|d| PricePoint {
                timestamp: start + chrono::Duration::days(d as i64),
                price: Decimal::from(100 + d),
            })
            .collect())
    }

    async fn global_market(&self) -> Result<GlobalMarket, FetchError> {
        Err(FetchError::Unexpected("not scripted".into()))
    }

    async fn trending(&self) -> Result<Vec<TrendingCoin>, FetchError> {
        Ok(Vec::new())
    }
}

/// App state over in-memory storage and the given provider, default config.
#[allow(dead_code)]
pub fn test_state(provider: Arc<FakeProvider>) -> (AppState, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let config = AppConfig::from_lookup(|_| None).expect("default config");
    let state = AppState::new(config, storage.clone(), provider);
    (state, storage)
}
