use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{AssetQuote, SortDirection, SortKey};
use crate::storage::Storage;

use super::favorites::FavoriteSet;
use super::sort::SortConfig;

/// Freshness of the snapshot as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No snapshot has been received yet.
    Loading,
    Ready,
    /// The last refresh failed; the previous snapshot (possibly empty) is kept.
    Degraded(String),
}

/// The market table: the last fetched snapshot, the active search term and
/// ordering, and the derived visible rows.
///
/// The snapshot is never reordered or mutated; `visible` holds indices into
/// it and is rebuilt whenever the snapshot, term or ordering change.
pub struct MarketView {
    snapshot: Vec<AssetQuote>,
    search: String,
    sort: SortConfig,
    visible: Vec<usize>,
    favorites: FavoriteSet,
    status: LoadState,
    last_refreshed: Option<DateTime<Utc>>,
}

impl MarketView {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            snapshot: Vec::new(),
            search: String::new(),
            sort: SortConfig::default(),
            visible: Vec::new(),
            favorites: FavoriteSet::load(storage),
            status: LoadState::Loading,
            last_refreshed: None,
        }
    }

    /// Replace the listing wholesale and re-apply filter and ordering.
    pub fn set_snapshot(&mut self, quotes: Vec<AssetQuote>) {
        self.snapshot = quotes;
        self.status = LoadState::Ready;
        self.last_refreshed = Some(Utc::now());
        self.rebuild();
        tracing::debug!(
            quotes = self.snapshot.len(),
            visible = self.visible.len(),
            "Market snapshot replaced"
        );
    }

    /// Record a failed refresh. The current snapshot stays on display.
    pub fn mark_degraded(&mut self, reason: impl Into<String>) {
        self.status = LoadState::Degraded(reason.into());
    }

    /// Show only rows whose name or symbol contains `term`, ignoring case.
    /// A blank term shows every row.
    pub fn filter(&mut self, term: &str) {
        self.search = term.to_string();
        self.rebuild();
    }

    /// Order visible rows by `key` in `direction`.
    pub fn sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort = SortConfig::new(key, direction);
        self.rebuild();
    }

    /// Header-click ordering: flips the active key, or activates a new one
    /// ascending.
    pub fn request_sort(&mut self, key: SortKey) -> SortConfig {
        self.sort = self.sort.requested(key);
        self.rebuild();
        self.sort
    }

    pub fn clear_sort(&mut self) {
        self.sort = SortConfig::unsorted();
        self.rebuild();
    }

    pub fn toggle_favorite(&mut self, asset_id: &str) -> bool {
        self.favorites.toggle(asset_id)
    }

    pub fn is_favorite(&self, asset_id: &str) -> bool {
        self.favorites.contains(asset_id)
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    /// Snapshot rows that are favorites, in snapshot order.
    pub fn favorite_quotes(&self) -> Vec<&AssetQuote> {
        self.snapshot
            .iter()
            .filter(|q| self.favorites.contains(&q.id))
            .collect()
    }

    pub fn visible(&self) -> Vec<&AssetQuote> {
        self.visible.iter().map(|&i| &self.snapshot[i]).collect()
    }

    pub fn snapshot(&self) -> &[AssetQuote] {
        &self.snapshot
    }

    pub fn quote(&self, asset_id: &str) -> Option<&AssetQuote> {
        self.snapshot.iter().find(|q| q.id == asset_id)
    }

    /// Current prices keyed by asset id, for rows that carry a price.
    pub fn prices(&self) -> HashMap<String, Decimal> {
        self.snapshot
            .iter()
            .filter_map(|q| q.current_price.map(|p| (q.id.clone(), p)))
            .collect()
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    pub fn status(&self) -> &LoadState {
        &self.status
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    fn rebuild(&mut self) {
        let needle = self.search.to_lowercase();
        let blank = self.search.trim().is_empty();

        let mut visible: Vec<usize> = self
            .snapshot
            .iter()
            .enumerate()
            .filter(|(_, q)| blank || q.matches(&needle))
            .map(|(i, _)| i)
            .collect();

        // Stable: equal rows keep snapshot order.
        let sort = self.sort;
        let snapshot = &self.snapshot;
        visible.sort_by(|&a, &b| sort.compare(&snapshot[a], &snapshot[b]));

        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn quote(id: &str, name: &str, symbol: &str, rank: u32, price: i64) -> AssetQuote {
        AssetQuote {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            current_price: Some(Decimal::from(price)),
            price_change_percentage_24h: None,
            market_cap: None,
            total_volume: None,
            circulating_supply: None,
            market_cap_rank: Some(rank),
            high_24h: None,
            low_24h: None,
            last_updated: None,
        }
    }

    fn view() -> MarketView {
        let mut view = MarketView::new(Arc::new(MemoryStorage::new()));
        view.set_snapshot(vec![
            quote("ethereum", "Ethereum", "eth", 2, 3000),
            quote("bitcoin", "Bitcoin", "btc", 1, 60000),
            quote("tether", "Tether", "usdt", 3, 1),
        ]);
        view
    }

    fn ids(view: &MarketView) -> Vec<&str> {
        view.visible().iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn starts_loading_then_ready_sorted_by_rank() {
        let empty = MarketView::new(Arc::new(MemoryStorage::new()));
        assert_eq!(empty.status(), &LoadState::Loading);

        let view = view();
        assert_eq!(view.status(), &LoadState::Ready);
        assert_eq!(ids(&view), vec!["bitcoin", "ethereum", "tether"]);
        // Snapshot itself is untouched.
        assert_eq!(view.snapshot()[0].id, "ethereum");
    }

    #[test]
    fn filter_matches_name_or_symbol_ignoring_case() {
        let mut view = view();
        view.filter("ETH");
        assert_eq!(ids(&view), vec!["ethereum"]);

        view.filter("usd");
        assert_eq!(ids(&view), vec!["tether"]);

        view.filter("   ");
        assert_eq!(ids(&view).len(), 3);
    }

    #[test]
    fn clear_sort_restores_snapshot_order() {
        let mut view = view();
        view.clear_sort();
        assert_eq!(view.sort_config().key, None);
        assert_eq!(ids(&view), vec!["ethereum", "bitcoin", "tether"]);
    }

    #[test]
    fn degraded_keeps_snapshot() {
        let mut view = view();
        view.mark_degraded("HTTP 429");
        assert_eq!(view.status(), &LoadState::Degraded("HTTP 429".into()));
        assert_eq!(view.visible().len(), 3);
    }

    #[test]
    fn favorites_do_not_touch_filter_or_sort() {
        let mut view = view();
        view.filter("e");
        view.request_sort(SortKey::CurrentPrice);
        let before = ids(&view).iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert!(view.toggle_favorite("tether"));
        assert!(view.is_favorite("tether"));
        assert_eq!(ids(&view), before);
        assert_eq!(view.favorite_quotes().len(), 1);
    }

    #[test]
    fn prices_skip_missing() {
        let mut view = view();
        let mut unpriced = quote("ghost", "Ghost", "gst", 4, 0);
        unpriced.current_price = None;
        let mut quotes = view.snapshot().to_vec();
        quotes.push(unpriced);
        view.set_snapshot(quotes);

        let prices = view.prices();
        assert_eq!(prices.len(), 3);
        assert_eq!(prices["bitcoin"], Decimal::from(60000));
    }
}
