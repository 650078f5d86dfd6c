use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{AssetQuote, SortDirection, SortKey};

/// The single active ordering of the market table.
///
/// `key == None` means no ordering is applied and rows keep snapshot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: Some(SortKey::MarketCapRank),
            direction: SortDirection::Asc,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    pub fn unsorted() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }

    /// Header-click transition: the active key flips direction, any other
    /// key becomes active ascending.
    pub fn requested(self, key: SortKey) -> Self {
        if self.key == Some(key) {
            Self::new(key, self.direction.flipped())
        } else {
            Self::new(key, SortDirection::Asc)
        }
    }

    /// Ordering of two rows under this config. Rows missing the keyed value
    /// go last in either direction.
    pub fn compare(&self, a: &AssetQuote, b: &AssetQuote) -> Ordering {
        let Some(key) = self.key else {
            return Ordering::Equal;
        };

        match key {
            SortKey::Name => self.directed(a.name.cmp(&b.name)),
            SortKey::Symbol => self.directed(a.symbol.cmp(&b.symbol)),
            SortKey::MarketCapRank => self.optional(a.market_cap_rank, b.market_cap_rank),
            SortKey::CurrentPrice => self.optional(a.current_price, b.current_price),
            SortKey::PriceChangePercentage24h => self.optional(
                a.price_change_percentage_24h,
                b.price_change_percentage_24h,
            ),
            SortKey::MarketCap => self.optional(a.market_cap, b.market_cap),
            SortKey::TotalVolume => self.optional(a.total_volume, b.total_volume),
            SortKey::CirculatingSupply => {
                self.optional(a.circulating_supply, b.circulating_supply)
            }
        }
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    fn optional<T: Ord>(&self, a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.directed(a.cmp(&b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
