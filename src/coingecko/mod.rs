pub mod client;
pub mod provider;
pub mod types;

pub use client::{CoinGeckoClient, FetchError};
pub use provider::QuoteProvider;
