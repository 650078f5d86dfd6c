use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, Duration};

use crate::coingecko::QuoteProvider;
use crate::market::MarketView;

use super::{DashboardEvent, FetchTicket, FetchTracker, RefreshOutcome};

/// Fetch the top listing and, if still wanted, swap it into the view.
///
/// A failed fetch marks the view degraded and keeps its last snapshot.
pub async fn refresh_market(
    provider: &dyn QuoteProvider,
    view: &Mutex<MarketView>,
    tracker: &FetchTracker,
    ticket: FetchTicket,
    per_page: u32,
) -> RefreshOutcome {
    let result = provider.top_coins(per_page).await;

    let mut view = view.lock().await;
    if !tracker.admit(ticket) {
        return RefreshOutcome::Discarded;
    }

    match result {
        Ok(quotes) => {
            tracing::info!(
                generation = ticket.generation(),
                quotes = quotes.len(),
                "Market snapshot refreshed"
            );
            view.set_snapshot(quotes);
            RefreshOutcome::Applied
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                generation = ticket.generation(),
                "Market refresh failed, keeping last snapshot"
            );
            let reason = e.to_string();
            view.mark_degraded(reason.clone());
            RefreshOutcome::Failed(reason)
        }
    }
}

/// Refresh the market view every `interval_secs` until the tracker shuts down.
///
/// Ticks are not coalesced: each one spawns its own request, and the
/// tracker decides which responses are applied.
pub async fn run_market_refresher(
    provider: Arc<dyn QuoteProvider>,
    view: Arc<Mutex<MarketView>>,
    tracker: Arc<FetchTracker>,
    per_page: u32,
    interval_secs: u64,
    events: Option<mpsc::Sender<DashboardEvent>>,
) {
    tracing::info!(
        interval_secs = interval_secs,
        per_page = per_page,
        "Market refresher started"
    );

    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        ticker.tick().await;

        if !tracker.is_live() {
            break;
        }

        let ticket = tracker.issue();
        let provider = provider.clone();
        let view = view.clone();
        let tracker = tracker.clone();
        let events = events.clone();

        tokio::spawn(async move {
            let outcome =
                refresh_market(provider.as_ref(), &view, &tracker, ticket, per_page).await;

            let event = match outcome {
                RefreshOutcome::Applied => DashboardEvent::MarketRefreshed {
                    quotes: view.lock().await.snapshot().len(),
                },
                RefreshOutcome::Failed(reason) => DashboardEvent::MarketRefreshFailed { reason },
                RefreshOutcome::Discarded => return,
            };

            if let Some(tx) = events {
                if let Err(e) = tx.send(event).await {
                    tracing::debug!(error = %e, "Dashboard event receiver gone");
                }
            }
        });
    }

    tracing::info!("Market refresher stopped");
}
