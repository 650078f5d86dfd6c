use std::fmt::Write;

use crate::format::{format_change, format_currency, format_large_number};
use crate::market::{LoadState, MarketView};
use crate::models::{GlobalMarket, SortDirection};
use crate::portfolio::PortfolioLedger;

/// Plain-text market table: the first `limit` visible rows, favorites starred.
pub fn format_market_table(view: &MarketView, limit: usize) -> String {
    let mut out = String::new();

    let sort = view.sort_config();
    let order = match sort.key {
        Some(key) => format!(
            "{key} {}",
            match sort.direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            }
        ),
        None => "unsorted".into(),
    };
    let _ = writeln!(
        out,
        "Market ({} of {} shown, search: {:?}, order: {order})",
        view.visible().len().min(limit),
        view.snapshot().len(),
        view.search_term(),
    );

    match view.status() {
        LoadState::Loading => {
            let _ = writeln!(out, "  Loading market data...");
            return out;
        }
        LoadState::Degraded(reason) => {
            let _ = writeln!(out, "  ! Data may be stale: {reason}");
        }
        LoadState::Ready => {}
    }

    let visible = view.visible();
    if visible.is_empty() {
        let _ = writeln!(out, "  No cryptocurrencies found.");
        return out;
    }

    for quote in visible.into_iter().take(limit) {
        let star = if view.is_favorite(&quote.id) { "*" } else { " " };
        let rank = quote
            .market_cap_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".into());
        let price = quote
            .current_price
            .map(format_currency)
            .unwrap_or_else(|| "N/A".into());
        let _ = writeln!(
            out,
            "{star} {rank:>4}  {:<20} {:<6} {:>16} {:>9}  cap {:>10}  vol {:>10}",
            quote.name,
            quote.symbol.to_uppercase(),
            price,
            format_change(quote.price_change_percentage_24h),
            format_large_number(quote.market_cap),
            format_large_number(quote.total_volume),
        );
    }
    out
}

/// Plain-text portfolio summary with per-position rows and totals.
pub fn format_portfolio(ledger: &PortfolioLedger) -> String {
    let mut out = String::new();
    let totals = ledger.totals();

    let _ = writeln!(
        out,
        "Portfolio: value {}  profit {}",
        format_currency(totals.total_value),
        format_currency(totals.total_profit),
    );

    if ledger.is_empty() {
        let _ = writeln!(out, "  No assets yet.");
        return out;
    }

    for p in ledger.positions() {
        let _ = writeln!(
            out,
            "  {:<20} {:>14} {:<6} avg {:>14} now {:>14} value {:>14} P/L {:>14} ({})",
            p.name,
            p.quantity.normalize(),
            p.symbol.to_uppercase(),
            format_currency(p.purchase_price),
            format_currency(p.current_price),
            format_currency(p.value),
            format_currency(p.profit),
            format_change(Some(p.profit_percentage)),
        );
    }
    out
}

pub fn format_global(global: &GlobalMarket) -> String {
    let dominance = match (global.btc_dominance, global.eth_dominance) {
        (Some(btc), Some(eth)) => format!("  BTC {}%  ETH {}%", btc.round_dp(1), eth.round_dp(1)),
        _ => String::new(),
    };
    format!(
        "Global: cap ${} ({} 24h)  volume ${}  {} coins on {} markets{dominance}",
        format_large_number(Some(global.total_market_cap)),
        format_change(Some(global.market_cap_change_percentage_24h)),
        format_large_number(Some(global.total_volume)),
        global.active_cryptocurrencies,
        global.markets,
    )
}
