use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::errors::DashboardError;
use crate::models::{AssetQuote, PortfolioTotals, Position};
use crate::storage::{portfolio_repo, Storage};

/// A validated purchase: positive quantity and price for a named asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub asset_id: String,
    pub quantity: Decimal,
    pub price: Decimal,
}

impl PurchaseRequest {
    pub fn new(asset_id: &str, quantity: Decimal, price: Decimal) -> Result<Self, DashboardError> {
        if asset_id.trim().is_empty() {
            return Err(DashboardError::InvalidInput(
                "Please select a cryptocurrency.".into(),
            ));
        }
        if quantity <= Decimal::ZERO || price <= Decimal::ZERO {
            return Err(DashboardError::InvalidInput(
                "Please enter valid positive numbers for quantity and purchase price.".into(),
            ));
        }
        Ok(Self {
            asset_id: asset_id.trim().to_string(),
            quantity,
            price,
        })
    }

    /// Build a request from raw form input.
    pub fn parse(asset_id: &str, quantity: &str, price: &str) -> Result<Self, DashboardError> {
        if asset_id.trim().is_empty() || quantity.trim().is_empty() || price.trim().is_empty() {
            return Err(DashboardError::InvalidInput(
                "Please fill out all fields.".into(),
            ));
        }
        let quantity = parse_amount(quantity)?;
        let price = parse_amount(price)?;
        Self::new(asset_id, quantity, price)
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, DashboardError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| {
            DashboardError::InvalidInput(
                "Please enter valid positive numbers for quantity and purchase price.".into(),
            )
        })
}

fn amount_too_large() -> DashboardError {
    DashboardError::InvalidInput("Quantity and purchase price are too large.".into())
}

/// The merged position after buying `request.quantity` more units at
/// `request.price`. The cached current price carries over.
fn merge_purchase(existing: &Position, request: &PurchaseRequest) -> Result<Position, DashboardError> {
    let new_quantity = existing
        .quantity
        .checked_add(request.quantity)
        .ok_or_else(amount_too_large)?;
    let total_cost = existing
        .cost()
        .ok()
        .zip(request.quantity.checked_mul(request.price))
        .and_then(|(held, bought)| held.checked_add(bought))
        .ok_or_else(amount_too_large)?;

    let mut merged = existing.clone();
    merged.quantity = new_quantity;
    merged.purchase_price = total_cost
        .checked_div(new_quantity)
        .ok_or_else(amount_too_large)?;
    merged.recompute().map_err(|_| amount_too_large())?;
    Ok(merged)
}

/// The user's simulated holdings, at most one position per asset.
///
/// Every mutation rewrites the whole ledger through the storage port. A
/// failed write is logged; the in-memory ledger stays authoritative.
pub struct PortfolioLedger {
    storage: Arc<dyn Storage>,
    positions: Vec<Position>,
}

impl PortfolioLedger {
    /// Restore the ledger from storage. Entries with a non-positive quantity
    /// or cost basis, entries whose derived amounts overflow, and repeated
    /// identifiers are dropped.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let stored = portfolio_repo::load_positions(storage.as_ref());
        let stored_count = stored.len();

        let mut seen = HashSet::new();
        let positions: Vec<Position> = stored
            .into_iter()
            .filter_map(|mut p| {
                let positive = p.quantity > Decimal::ZERO && p.purchase_price > Decimal::ZERO;
                if !positive || p.recompute().is_err() {
                    return None;
                }
                seen.insert(p.id.clone()).then_some(p)
            })
            .collect();

        if positions.len() != stored_count {
            tracing::warn!(
                stored = stored_count,
                kept = positions.len(),
                "Dropped invalid or duplicate stored positions"
            );
        }

        tracing::info!(positions = positions.len(), "Portfolio ledger loaded");
        Self { storage, positions }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn get(&self, asset_id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == asset_id)
    }

    pub fn held_ids(&self) -> Vec<String> {
        self.positions.iter().map(|p| p.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Record a purchase of `quantity` units at `price`.
    ///
    /// `quotes` is the last fetched listing; the asset must appear in it.
    /// A repeated purchase merges into the existing position with a
    /// quantity-weighted average cost basis.
    pub fn add_purchase(
        &mut self,
        quotes: &[AssetQuote],
        asset_id: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Position, DashboardError> {
        let request = PurchaseRequest::new(asset_id, quantity, price)?;
        let quote = quotes.iter().find(|q| q.id == request.asset_id);
        self.record(quote, &request)
    }

    /// Apply a validated purchase. `quote` is the listing entry for the
    /// requested asset, `None` if the listing does not carry it.
    ///
    /// Amounts too large to represent are rejected before anything changes.
    pub fn record(
        &mut self,
        quote: Option<&AssetQuote>,
        request: &PurchaseRequest,
    ) -> Result<Position, DashboardError> {
        let quote = quote
            .filter(|q| q.id == request.asset_id)
            .ok_or_else(|| DashboardError::UnknownAsset(request.asset_id.clone()))?;

        let position = match self.positions.iter_mut().find(|p| p.id == request.asset_id) {
            Some(existing) => {
                let merged = merge_purchase(existing, request)?;
                *existing = merged;

                tracing::info!(
                    asset_id = %existing.id,
                    added = %request.quantity,
                    quantity = %existing.quantity,
                    avg_price = %existing.purchase_price,
                    "Merged purchase into existing position"
                );
                existing.clone()
            }
            None => {
                let mut position = Position {
                    id: quote.id.clone(),
                    name: quote.name.clone(),
                    symbol: quote.symbol.clone(),
                    image: quote.image.clone(),
                    quantity: request.quantity,
                    purchase_price: request.price,
                    current_price: quote.price(),
                    value: Decimal::ZERO,
                    profit: Decimal::ZERO,
                    profit_percentage: Decimal::ZERO,
                };
                position.recompute().map_err(|_| amount_too_large())?;

                tracing::info!(
                    asset_id = %position.id,
                    quantity = %position.quantity,
                    price = %position.purchase_price,
                    "Opened new position"
                );
                self.positions.push(position.clone());
                position
            }
        };

        self.persist();
        Ok(position)
    }

    /// Remove the position for `asset_id`. Returns whether one was held.
    pub fn remove_position(&mut self, asset_id: &str) -> bool {
        let before = self.positions.len();
        self.positions.retain(|p| p.id != asset_id);
        let removed = self.positions.len() != before;

        if removed {
            tracing::info!(asset_id = asset_id, "Position removed");
        } else {
            tracing::debug!(asset_id = asset_id, "Remove requested for asset not held");
        }

        self.persist();
        removed
    }

    /// Apply fresh prices and return the new totals.
    ///
    /// Positions without an entry in `prices` keep their cached price.
    /// Applying the same map twice yields the same state.
    pub fn revalue(&mut self, prices: &HashMap<String, Decimal>) -> PortfolioTotals {
        let mut updated = 0usize;
        for position in &mut self.positions {
            let Some(price) = prices.get(&position.id) else {
                continue;
            };
            match position.reprice(*price) {
                Ok(()) => updated += 1,
                Err(e) => tracing::warn!(
                    asset_id = %position.id,
                    price = %price,
                    error = %e,
                    "Price out of range for position, keeping cached price"
                ),
            }
        }

        let totals = self.totals();
        tracing::debug!(
            updated = updated,
            held = self.positions.len(),
            total_value = %totals.total_value,
            total_profit = %totals.total_profit,
            "Portfolio revalued"
        );

        if updated > 0 {
            self.persist();
        }
        totals
    }

    pub fn totals(&self) -> PortfolioTotals {
        self.positions
            .iter()
            .fold(PortfolioTotals::default(), |acc, p| PortfolioTotals {
                total_value: acc.total_value.saturating_add(p.value),
                total_profit: acc.total_profit.saturating_add(p.profit),
            })
    }

    fn persist(&self) {
        if let Err(e) = portfolio_repo::save_positions(self.storage.as_ref(), &self.positions) {
            tracing::error!(error = %e, "Failed to persist portfolio ledger");
        }
    }
}
