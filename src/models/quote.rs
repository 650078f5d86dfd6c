use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the `/coins/markets` listing.
///
/// Field names follow the provider payload so the listing deserializes
/// directly. Numeric columns other than the price can be `null` upstream
/// for thinly traded assets.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetQuote {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<Decimal>,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    #[serde(default)]
    pub total_volume: Option<Decimal>,
    #[serde(default)]
    pub circulating_supply: Option<Decimal>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub high_24h: Option<Decimal>,
    #[serde(default)]
    pub low_24h: Option<Decimal>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl AssetQuote {
    /// Current price, treating a missing price as zero.
    pub fn price(&self) -> Decimal {
        self.current_price.unwrap_or(Decimal::ZERO)
    }

    /// Case-insensitive substring match on name or symbol.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}
