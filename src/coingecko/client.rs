use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use thiserror::Error;

use crate::models::{AssetQuote, CoinDetail, GlobalMarket, PricePoint, TrendingCoin};

use super::provider::QuoteProvider;
use super::types::{ApiCoinDetail, ApiGlobal, ApiMarketChart, ApiTrending};

pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// All prices are quoted in USD.
const VS_CURRENCY: &str = "usd";

/// Largest page `/coins/markets` serves; longer id lists are split.
pub const MAX_PER_PAGE: usize = 250;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Attach a demo-plan API key, sent as `x-cg-demo-api-key`.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<RequestBuilder, FetchError> {
        let raw = format!("{}{}", self.base_url, path);
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        }
        .map_err(|e| FetchError::Unexpected(format!("invalid request URL: {e}")))?;
        let req = self.http.get(url);
        Ok(match &self.api_key {
            Some(key) => req.header("x-cg-demo-api-key", key),
            None => req,
        })
    }

    async fn markets(&self, extra: &[(&str, &str)]) -> Result<Vec<AssetQuote>, FetchError> {
        let mut params = vec![
            ("vs_currency", VS_CURRENCY),
            ("order", "market_cap_desc"),
            ("page", "1"),
            ("sparkline", "false"),
        ];
        params.extend_from_slice(extra);

        let resp = self
            .get("/coins/markets", &params)?
            .send()
            .await?
            .error_for_status()?;

        let quotes: Vec<AssetQuote> = resp.json().await?;
        Ok(quotes)
    }
}

/// `ids` and `per_page` values for one `/coins/markets` batch.
fn batch_params(batch: &[String]) -> (String, String) {
    (batch.join(","), batch.len().to_string())
}

#[async_trait]
impl QuoteProvider for CoinGeckoClient {
    async fn top_coins(&self, per_page: u32) -> Result<Vec<AssetQuote>, FetchError> {
        let per_page = per_page.to_string();
        self.markets(&[("per_page", per_page.as_str())]).await
    }

    async fn quotes_for(&self, ids: &[String]) -> Result<Vec<AssetQuote>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut quotes = Vec::with_capacity(ids.len());
        for batch in ids.chunks(MAX_PER_PAGE) {
            let (joined, per_page) = batch_params(batch);
            let page = self
                .markets(&[("ids", joined.as_str()), ("per_page", per_page.as_str())])
                .await?;
            quotes.extend(page);
        }
        Ok(quotes)
    }

    async fn coin_detail(&self, id: &str) -> Result<CoinDetail, FetchError> {
        if id.is_empty() {
            return Err(FetchError::Unexpected("empty coin id".into()));
        }
        let resp = self
            .get(
                &format!("/coins/{id}"),
                &[
                    ("localization", "false"),
                    ("tickers", "false"),
                    ("market_data", "true"),
                    ("community_data", "false"),
                    ("developer_data", "false"),
                    ("sparkline", "false"),
                ],
            )?
            .send()
            .await?
            .error_for_status()?;

        let detail: ApiCoinDetail = resp.json().await?;
        Ok(detail.into())
    }

    async fn price_history(&self, id: &str, days: u32) -> Result<Vec<PricePoint>, FetchError> {
        if id.is_empty() {
            return Err(FetchError::Unexpected("empty coin id".into()));
        }
        let days = days.to_string();
        let resp = self
            .get(
                &format!("/coins/{id}/market_chart"),
                &[("vs_currency", VS_CURRENCY), ("days", days.as_str())],
            )?
            .send()
            .await?
            .error_for_status()?;

        let chart: ApiMarketChart = resp.json().await?;
        Ok(chart.into_points())
    }

    async fn global_market(&self) -> Result<GlobalMarket, FetchError> {
        let resp = self.get("/global", &[])?.send().await?.error_for_status()?;
        let global: ApiGlobal = resp.json().await?;
        Ok(global.into())
    }

    async fn trending(&self) -> Result<Vec<TrendingCoin>, FetchError> {
        let resp = self
            .get("/search/trending", &[])?
            .send()
            .await?
            .error_for_status()?;
        let trending: ApiTrending = resp.json().await?;
        Ok(trending.into_coins())
    }
}
