use std::env;
use std::path::PathBuf;

use crate::coingecko::client::{COINGECKO_API_BASE, MAX_PER_PAGE};
use crate::models::{SortDirection, SortKey};

const DEFAULT_DATA_DIR: &str = ".coinboard";
const DEFAULT_AUTH_SECRET: &str = "coinboard-local-session";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the locally persisted records.
    pub data_dir: PathBuf,

    // Quote provider
    pub coingecko_api_base: String,
    pub coingecko_api_key: Option<String>,
    pub request_timeout_secs: u64,

    // Refresh cadence
    pub market_page_size: u32,
    pub market_refresh_secs: u64,
    pub portfolio_refresh_secs: u64,
    pub price_history_days: u32,

    // Initial table state
    pub default_search: String,
    pub default_sort: SortKey,
    pub default_sort_direction: SortDirection,
    pub report_rows: usize,

    pub auth_secret: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let default_sort = match get("DEFAULT_SORT") {
            Some(raw) => SortKey::from_api_str(&raw)
                .ok_or_else(|| anyhow::anyhow!("DEFAULT_SORT has unknown column '{raw}'"))?,
            None => SortKey::MarketCapRank,
        };
        let default_sort_direction = match get("DEFAULT_SORT_DIRECTION")
            .map(|raw| raw.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("desc") => SortDirection::Desc,
            Some("asc") | None => SortDirection::Asc,
            Some(other) => anyhow::bail!("DEFAULT_SORT_DIRECTION must be asc or desc, got '{other}'"),
        };

        let market_page_size: u32 = get("MARKET_PAGE_SIZE")
            .unwrap_or_else(|| "100".into())
            .parse()?;
        if market_page_size == 0 || (market_page_size as usize) > MAX_PER_PAGE {
            anyhow::bail!("MARKET_PAGE_SIZE must be between 1 and {MAX_PER_PAGE}");
        }

        Ok(Self {
            data_dir: get("COINBOARD_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.into())
                .into(),

            coingecko_api_base: get("COINGECKO_API_BASE")
                .unwrap_or_else(|| COINGECKO_API_BASE.into()),
            coingecko_api_key: get("COINGECKO_API_KEY").filter(|k| !k.is_empty()),
            request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "15".into())
                .parse()?,

            market_page_size,
            market_refresh_secs: get("MARKET_REFRESH_SECS")
                .unwrap_or_else(|| "120".into())
                .parse()?,
            portfolio_refresh_secs: get("PORTFOLIO_REFRESH_SECS")
                .unwrap_or_else(|| "60".into())
                .parse()?,
            price_history_days: get("PRICE_HISTORY_DAYS")
                .unwrap_or_else(|| "7".into())
                .parse()?,

            default_search: get("DEFAULT_SEARCH").unwrap_or_default(),
            default_sort,
            default_sort_direction,
            report_rows: get("REPORT_ROWS")
                .unwrap_or_else(|| "20".into())
                .parse()?,

            auth_secret: get("AUTH_SECRET").unwrap_or_else(|| DEFAULT_AUTH_SECRET.into()),
        })
    }

    /// Returns true if a provider API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.coingecko_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_dashboard_cadence() {
        let config = config(&[]).unwrap();
        assert_eq!(config.market_refresh_secs, 120);
        assert_eq!(config.portfolio_refresh_secs, 60);
        assert_eq!(config.market_page_size, 100);
        assert_eq!(config.price_history_days, 7);
        assert_eq!(config.default_sort, SortKey::MarketCapRank);
        assert_eq!(config.default_sort_direction, SortDirection::Asc);
        assert_eq!(config.coingecko_api_base, COINGECKO_API_BASE);
        assert!(!config.has_api_key());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("MARKET_REFRESH_SECS", "30"),
            ("DEFAULT_SORT", "price"),
            ("DEFAULT_SORT_DIRECTION", "desc"),
            ("COINGECKO_API_KEY", "demo-key"),
            ("COINBOARD_DATA_DIR", "/tmp/board"),
        ])
        .unwrap();
        assert_eq!(config.market_refresh_secs, 30);
        assert_eq!(config.default_sort, SortKey::CurrentPrice);
        assert_eq!(config.default_sort_direction, SortDirection::Desc);
        assert!(config.has_api_key());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/board"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[("DEFAULT_SORT", "colour")]).is_err());
        assert!(config(&[("MARKET_PAGE_SIZE", "0")]).is_err());
        assert!(config(&[("MARKET_REFRESH_SECS", "soon")]).is_err());
        assert!(config(&[("DEFAULT_SORT_DIRECTION", "up")]).is_err());
        assert!(config(&[("PRICE_HISTORY_DAYS", "a week")]).is_err());
        assert!(config(&[("REPORT_ROWS", "-1")]).is_err());
        assert!(config(&[("MARKET_PAGE_SIZE", "251")]).is_err());
    }

    #[test]
    fn sort_settings_ignore_case() {
        let config = config(&[("DEFAULT_SORT", "Name"), ("DEFAULT_SORT_DIRECTION", "DESC")]).unwrap();
        assert_eq!(config.default_sort, SortKey::Name);
        assert_eq!(config.default_sort_direction, SortDirection::Desc);
    }
}
