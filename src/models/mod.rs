pub mod coin;
pub mod position;
pub mod quote;
pub mod user;

pub use coin::{CoinDetail, GlobalMarket, PricePoint, TrendingCoin};
pub use position::{AmountOverflow, PortfolioTotals, Position};
pub use quote::AssetQuote;
pub use user::{Session, User};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SortKey / SortDirection
// ---------------------------------------------------------------------------

/// Market table column an ordering can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    MarketCapRank,
    Name,
    Symbol,
    CurrentPrice,
    PriceChangePercentage24h,
    MarketCap,
    TotalVolume,
    CirculatingSupply,
}

impl SortKey {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "market_cap_rank" | "rank" => Some(SortKey::MarketCapRank),
            "name" => Some(SortKey::Name),
            "symbol" => Some(SortKey::Symbol),
            "current_price" | "price" => Some(SortKey::CurrentPrice),
            "price_change_percentage_24h" | "change" => Some(SortKey::PriceChangePercentage24h),
            "market_cap" => Some(SortKey::MarketCap),
            "total_volume" | "volume" => Some(SortKey::TotalVolume),
            "circulating_supply" | "supply" => Some(SortKey::CirculatingSupply),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::MarketCapRank => "market_cap_rank",
            SortKey::Name => "name",
            SortKey::Symbol => "symbol",
            SortKey::CurrentPrice => "current_price",
            SortKey::PriceChangePercentage24h => "price_change_percentage_24h",
            SortKey::MarketCap => "market_cap",
            SortKey::TotalVolume => "total_volume",
            SortKey::CirculatingSupply => "circulating_supply",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}
