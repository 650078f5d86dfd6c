use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A derived amount does not fit in a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount out of range")]
pub struct AmountOverflow;

/// A held asset: quantity, average cost basis and the last known price.
///
/// `value`, `profit` and `profit_percentage` are derived and are stored
/// alongside the inputs so a restored ledger renders before the first
/// revaluation completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: Decimal,
    /// Average purchase price (quantity-weighted).
    pub purchase_price: Decimal,
    pub current_price: Decimal,
    #[serde(default)]
    pub value: Decimal,
    #[serde(default)]
    pub profit: Decimal,
    #[serde(default)]
    pub profit_percentage: Decimal,
}

impl Position {
    /// Recompute value, profit and profit percentage from the current
    /// inputs. A zero cost basis yields a profit percentage of zero.
    ///
    /// On overflow the position is left unchanged.
    pub fn recompute(&mut self) -> Result<(), AmountOverflow> {
        self.reprice(self.current_price)
    }

    /// Move to `price` and recompute the derived fields. On overflow the
    /// position, including its cached price, is left unchanged.
    pub fn reprice(&mut self, price: Decimal) -> Result<(), AmountOverflow> {
        let value = self.quantity.checked_mul(price).ok_or(AmountOverflow)?;
        let profit = value.checked_sub(self.cost()?).ok_or(AmountOverflow)?;
        let profit_percentage = if self.purchase_price.is_zero() {
            Decimal::ZERO
        } else {
            price
                .checked_sub(self.purchase_price)
                .and_then(|diff| diff.checked_div(self.purchase_price))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(AmountOverflow)?
        };

        self.current_price = price;
        self.value = value;
        self.profit = profit;
        self.profit_percentage = profit_percentage;
        Ok(())
    }

    /// Total amount paid for the held quantity.
    pub fn cost(&self) -> Result<Decimal, AmountOverflow> {
        self.quantity
            .checked_mul(self.purchase_price)
            .ok_or(AmountOverflow)
    }
}

/// Aggregate value and profit across every position in the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub total_value: Decimal,
    pub total_profit: Decimal,
}
