mod common;

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use coinboard::errors::DashboardError;
use coinboard::models::PortfolioTotals;
use coinboard::portfolio::PortfolioLedger;
use coinboard::storage::{MemoryStorage, Storage};

use common::sample_listing;

fn new_ledger() -> (PortfolioLedger, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (PortfolioLedger::load(storage.clone()), storage)
}

fn prices(entries: &[(&str, i64)]) -> HashMap<String, Decimal> {
    entries
        .iter()
        .map(|(id, p)| (id.to_string(), Decimal::from(*p)))
        .collect()
}

#[test]
fn test_repeated_purchase_uses_weighted_average() {
    let (mut ledger, _) = new_ledger();
    let quotes = sample_listing();

    ledger
        .add_purchase(&quotes, "x", Decimal::from(2), Decimal::from(100))
        .unwrap();
    let pos = ledger
        .add_purchase(&quotes, "x", Decimal::from(2), Decimal::from(200))
        .unwrap();

    assert_eq!(pos.quantity, Decimal::from(4));
    assert_eq!(pos.purchase_price, Decimal::from(150));
    assert_eq!(ledger.positions().len(), 1);
}

#[test]
fn test_weighted_average_is_order_independent() {
    let buys = [
        (Decimal::from(1), Decimal::from(10)),
        (Decimal::from(3), Decimal::from(30)),
        (Decimal::new(5, 1), Decimal::from(70)),
        (Decimal::new(15, 1), Decimal::from(50)),
    ];
    let quotes = sample_listing();

    let (mut forward, _) = new_ledger();
    for (qty, price) in buys {
        forward.add_purchase(&quotes, "x", qty, price).unwrap();
    }

    let (mut backward, _) = new_ledger();
    for (qty, price) in buys.iter().rev() {
        backward.add_purchase(&quotes, "x", *qty, *price).unwrap();
    }

    // (10 + 90 + 35 + 75) / 6 = 35
    let expected = Decimal::from(35);
    assert_eq!(forward.get("x").unwrap().purchase_price, expected);
    assert_eq!(backward.get("x").unwrap().purchase_price, expected);
    assert_eq!(forward.get("x").unwrap().quantity, Decimal::from(6));
}

#[test]
fn test_weighted_average_with_repeating_quotient() {
    let buys = [(1, 1), (2, 2), (7, 3), (3, 5)];
    let quotes = sample_listing();

    let (mut forward, _) = new_ledger();
    for (qty, price) in buys {
        forward
            .add_purchase(&quotes, "x", Decimal::from(qty), Decimal::from(price))
            .unwrap();
    }

    let (mut backward, _) = new_ledger();
    for (qty, price) in buys.iter().rev() {
        backward
            .add_purchase(&quotes, "x", Decimal::from(*qty), Decimal::from(*price))
            .unwrap();
    }

    // 41 / 13 does not terminate; both orders must land on the same rounding.
    let exact = Decimal::from(41) / Decimal::from(13);
    let tolerance = Decimal::new(1, 20);
    let fwd = forward.get("x").unwrap();
    let bwd = backward.get("x").unwrap();
    assert_eq!(fwd.quantity, Decimal::from(13));
    assert_eq!(bwd.quantity, Decimal::from(13));
    assert!((fwd.purchase_price - exact).abs() < tolerance);
    assert!((bwd.purchase_price - exact).abs() < tolerance);
    assert!((fwd.purchase_price - bwd.purchase_price).abs() < tolerance);
}

#[test]
fn test_revalue_scenario_from_dashboard() {
    let (mut ledger, _) = new_ledger();
    let quotes = sample_listing();
    ledger
        .add_purchase(&quotes, "x", Decimal::from(2), Decimal::from(100))
        .unwrap();
    ledger
        .add_purchase(&quotes, "x", Decimal::from(2), Decimal::from(200))
        .unwrap();

    let totals = ledger.revalue(&prices(&[("x", 180)]));

    let pos = ledger.get("x").unwrap();
    assert_eq!(pos.current_price, Decimal::from(180));
    assert_eq!(pos.value, Decimal::from(720));
    assert_eq!(pos.profit, Decimal::from(120));
    assert_eq!(pos.profit_percentage, Decimal::from(20));
    assert_eq!(
        totals,
        PortfolioTotals {
            total_value: Decimal::from(720),
            total_profit: Decimal::from(120),
        }
    );
}

#[test]
fn test_revalue_is_idempotent() {
    let (mut ledger, _) = new_ledger();
    let quotes = sample_listing();
    ledger
        .add_purchase(&quotes, "bitcoin", Decimal::new(5, 1), Decimal::from(50_000))
        .unwrap();
    ledger
        .add_purchase(&quotes, "tether", Decimal::from(1_000), Decimal::ONE)
        .unwrap();

    let map = prices(&[("bitcoin", 61_000), ("tether", 1)]);
    let first_totals = ledger.revalue(&map);
    let first_positions = ledger.positions().to_vec();

    let second_totals = ledger.revalue(&map);
    assert_eq!(first_totals, second_totals);
    assert_eq!(first_positions, ledger.positions());
}

#[test]
fn test_revalue_keeps_cached_price_when_missing() {
    let (mut ledger, _) = new_ledger();
    let quotes = sample_listing();
    ledger
        .add_purchase(&quotes, "ethereum", Decimal::ONE, Decimal::from(2_500))
        .unwrap();
    ledger
        .add_purchase(&quotes, "x", Decimal::ONE, Decimal::from(90))
        .unwrap();

    let totals = ledger.revalue(&prices(&[("x", 110)]));

    let eth = ledger.get("ethereum").unwrap();
    assert_eq!(eth.current_price, Decimal::from(3_000));
    assert_eq!(eth.profit, Decimal::from(500));
    assert_eq!(ledger.positions().len(), 2);
    assert_eq!(totals.total_value, Decimal::from(3_110));
    assert_eq!(totals.total_profit, Decimal::from(520));
}

#[test]
fn test_remove_then_purchase_starts_fresh() {
    let (mut ledger, _) = new_ledger();
    let quotes = sample_listing();
    ledger
        .add_purchase(&quotes, "x", Decimal::from(10), Decimal::from(1))
        .unwrap();

    assert!(ledger.remove_position("x"));
    let pos = ledger
        .add_purchase(&quotes, "x", Decimal::from(2), Decimal::from(100))
        .unwrap();

    assert_eq!(pos.quantity, Decimal::from(2));
    assert_eq!(pos.purchase_price, Decimal::from(100));
    assert_eq!(pos.current_price, Decimal::from(100));
}

#[test]
fn test_removed_position_contributes_nothing() {
    let (mut ledger, _) = new_ledger();
    let quotes = sample_listing();
    ledger
        .add_purchase(&quotes, "x", Decimal::from(4), Decimal::from(150))
        .unwrap();
    ledger
        .add_purchase(&quotes, "tether", Decimal::from(10), Decimal::ONE)
        .unwrap();

    ledger.remove_position("x");
    let totals = ledger.revalue(&prices(&[("x", 180), ("tether", 1)]));

    assert!(ledger.get("x").is_none());
    assert_eq!(totals.total_value, Decimal::from(10));
    assert_eq!(totals.total_profit, Decimal::ZERO);
}

#[test]
fn test_remove_absent_is_noop() {
    let (mut ledger, _) = new_ledger();
    assert!(!ledger.remove_position("nothing"));
    assert!(ledger.is_empty());
}

#[test]
fn test_unknown_asset_rejected() {
    let (mut ledger, _) = new_ledger();
    let result = ledger.add_purchase(&sample_listing(), "dogecoin", Decimal::ONE, Decimal::ONE);
    assert!(matches!(result, Err(DashboardError::UnknownAsset(_))));
    assert!(ledger.is_empty());
}

#[test]
fn test_ledger_survives_reload() {
    let (mut ledger, storage) = new_ledger();
    let quotes = sample_listing();
    ledger
        .add_purchase(&quotes, "x", Decimal::from(2), Decimal::from(100))
        .unwrap();
    ledger
        .add_purchase(&quotes, "x", Decimal::from(2), Decimal::from(200))
        .unwrap();
    ledger.revalue(&prices(&[("x", 180)]));

    let reloaded = PortfolioLedger::load(storage);
    let pos = reloaded.get("x").unwrap();
    assert_eq!(pos.quantity, Decimal::from(4));
    assert_eq!(pos.purchase_price, Decimal::from(150));
    assert_eq!(pos.current_price, Decimal::from(180));
    assert_eq!(reloaded.totals(), ledger.totals());
}

#[test]
fn test_corrupt_ledger_resets_to_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set("portfolio", "[{\"id\":").unwrap();

    let ledger = PortfolioLedger::load(storage.clone());
    assert!(ledger.is_empty());
    assert_eq!(storage.get("portfolio").unwrap(), None);
}
