use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, Duration};

use crate::coingecko::QuoteProvider;
use crate::portfolio::PortfolioLedger;

use super::{DashboardEvent, FetchTicket, FetchTracker, RefreshOutcome};

/// Price the held assets and revalue the ledger with the result.
///
/// Only identifiers currently held are requested. Assets the provider
/// omits keep their cached price.
pub async fn revalue_portfolio(
    provider: &dyn QuoteProvider,
    ledger: &Mutex<PortfolioLedger>,
    tracker: &FetchTracker,
    ticket: FetchTicket,
) -> RefreshOutcome {
    let ids = ledger.lock().await.held_ids();
    if ids.is_empty() {
        tracing::debug!("Portfolio empty, nothing to revalue");
        return RefreshOutcome::Applied;
    }

    let result = provider.quotes_for(&ids).await;

    let mut ledger = ledger.lock().await;
    if !tracker.admit(ticket) {
        return RefreshOutcome::Discarded;
    }

    match result {
        Ok(quotes) => {
            let prices: HashMap<String, Decimal> = quotes
                .into_iter()
                .filter_map(|q| q.current_price.map(|p| (q.id, p)))
                .collect();

            let missing = ids.iter().filter(|id| !prices.contains_key(*id)).count();
            if missing > 0 {
                tracing::debug!(missing = missing, "Some held assets were not priced");
            }

            let totals = ledger.revalue(&prices);
            tracing::info!(
                generation = ticket.generation(),
                positions = ids.len(),
                total_value = %totals.total_value,
                total_profit = %totals.total_profit,
                "Portfolio revalued"
            );
            RefreshOutcome::Applied
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                generation = ticket.generation(),
                "Portfolio price update failed, keeping cached prices"
            );
            RefreshOutcome::Failed(e.to_string())
        }
    }
}

/// Revalue the ledger every `interval_secs` until the tracker shuts down.
pub async fn run_portfolio_refresher(
    provider: Arc<dyn QuoteProvider>,
    ledger: Arc<Mutex<PortfolioLedger>>,
    tracker: Arc<FetchTracker>,
    interval_secs: u64,
    events: Option<mpsc::Sender<DashboardEvent>>,
) {
    tracing::info!(interval_secs = interval_secs, "Portfolio refresher started");

    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        ticker.tick().await;

        if !tracker.is_live() {
            break;
        }

        let ticket = tracker.issue();
        let provider = provider.clone();
        let ledger = ledger.clone();
        let tracker = tracker.clone();
        let events = events.clone();

        tokio::spawn(async move {
            let outcome = revalue_portfolio(provider.as_ref(), &ledger, &tracker, ticket).await;

            let event = match outcome {
                RefreshOutcome::Applied => {
                    DashboardEvent::PortfolioRevalued(ledger.lock().await.totals())
                }
                RefreshOutcome::Failed(reason) => {
                    DashboardEvent::PortfolioRevalueFailed { reason }
                }
                RefreshOutcome::Discarded => return,
            };

            if let Some(tx) = events {
                if let Err(e) = tx.send(event).await {
                    tracing::debug!(error = %e, "Dashboard event receiver gone");
                }
            }
        });
    }

    tracing::info!("Portfolio refresher stopped");
}
