use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use coinboard::coingecko::{CoinGeckoClient, QuoteProvider};
use coinboard::config::AppConfig;
use coinboard::services::market_refresher::run_market_refresher;
use coinboard::services::portfolio_refresher::run_portfolio_refresher;
use coinboard::services::report::{format_global, format_market_table, format_portfolio};
use coinboard::services::DashboardEvent;
use coinboard::storage::{FileStorage, Storage};
use coinboard::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.data_dir)?);
    tracing::info!(data_dir = %config.data_dir.display(), "Local storage ready");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    if !config.has_api_key() {
        tracing::warn!("No COINGECKO_API_KEY set, using the public rate-limited API");
    }
    let provider: Arc<dyn QuoteProvider> = Arc::new(
        CoinGeckoClient::new(http, config.coingecko_api_base.clone())
            .with_api_key(config.coingecko_api_key.clone()),
    );

    let state = AppState::new(config.clone(), storage, provider.clone());
    tracing::info!(
        theme = %state.theme(),
        user = ?state.auth.current_user().map(|u| u.email),
        "Dashboard state restored"
    );

    match provider.global_market().await {
        Ok(global) => tracing::info!("{}", format_global(&global)),
        Err(e) => tracing::warn!(error = %e, "Global market data unavailable"),
    }
    match provider.trending().await {
        Ok(coins) => {
            let names: Vec<&str> = coins.iter().map(|c| c.name.as_str()).collect();
            tracing::info!(trending = ?names, "Trending coins");
        }
        Err(e) => tracing::warn!(error = %e, "Trending coins unavailable"),
    }

    // --- Refresh loops: market snapshot and portfolio revaluation ---
    let (event_tx, mut event_rx) = mpsc::channel::<DashboardEvent>(64);

    tokio::spawn(run_market_refresher(
        provider.clone(),
        state.market.clone(),
        state.market_tracker.clone(),
        config.market_page_size,
        config.market_refresh_secs,
        Some(event_tx.clone()),
    ));
    tokio::spawn(run_portfolio_refresher(
        provider,
        state.ledger.clone(),
        state.portfolio_tracker.clone(),
        config.portfolio_refresh_secs,
        Some(event_tx),
    ));

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    tracing::warn!("Dashboard event channel closed");
                    break;
                };
                render(&state, event).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    state.shutdown();
    Ok(())
}

async fn render(state: &AppState, event: DashboardEvent) {
    match event {
        DashboardEvent::MarketRefreshed { quotes } => {
            let market = state.market.lock().await;
            tracing::info!(
                quotes = quotes,
                favorites = market.favorites().len(),
                "\n{}",
                format_market_table(&market, state.config.report_rows)
            );
        }
        DashboardEvent::MarketRefreshFailed { reason } => {
            tracing::warn!(reason = %reason, "Market data is stale");
        }
        DashboardEvent::PortfolioRevalued(_) => {
            let ledger = state.ledger.lock().await;
            tracing::info!("\n{}", format_portfolio(&ledger));
        }
        DashboardEvent::PortfolioRevalueFailed { reason } => {
            tracing::warn!(reason = %reason, "Portfolio prices are stale");
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
