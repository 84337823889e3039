use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const PRICE_API_URL: &str = "https://steamcommunity.com/market/priceoverview/";

/// Market context sent with every lookup: Brazil / BRL. Fixed because
/// `fetcher::parse_price` only understands BRL-formatted prices.
pub const COUNTRY: &str = "BR";
pub const CURRENCY: u32 = 7;
pub const DEFAULT_APP_ID: u32 = 730;

/// Pause between consecutive lookups in a sweep (milliseconds).
pub const REQUEST_DELAY_MS: u64 = 1500;

/// Cooldown after an HTTP 429 before the same request is retried (seconds).
pub const RATE_LIMIT_COOLDOWN_SECS: u64 = 30;

/// Per-request HTTP timeout (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("sticker-monitor/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    pub price_api_url: String,
    /// `appid` query parameter (MARKET_APP_ID)
    pub app_id: u32,
    pub catalog_path: PathBuf,
    pub baseline_path: PathBuf,
    pub report_path: PathBuf,
    pub request_delay: Duration,
    pub rate_limit_cooldown: Duration,
    /// Retry ceiling for 429 responses (RATE_LIMIT_MAX_RETRIES). None = retry forever.
    pub rate_limit_max_retries: Option<u32>,
    pub http_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            price_api_url: var("PRICE_API_URL", PRICE_API_URL),
            app_id: parse_num("MARKET_APP_ID", lookup("MARKET_APP_ID"), DEFAULT_APP_ID)?,
            catalog_path: PathBuf::from(var("CATALOG_PATH", "catalog.json")),
            baseline_path: PathBuf::from(var("BASELINE_PATH", "baseline.json")),
            report_path: PathBuf::from(var("REPORT_PATH", "report.json")),
            request_delay: Duration::from_millis(parse_num(
                "REQUEST_DELAY_MS",
                lookup("REQUEST_DELAY_MS"),
                REQUEST_DELAY_MS,
            )?),
            rate_limit_cooldown: Duration::from_secs(parse_num(
                "RATE_LIMIT_COOLDOWN_SECS",
                lookup("RATE_LIMIT_COOLDOWN_SECS"),
                RATE_LIMIT_COOLDOWN_SECS,
            )?),
            rate_limit_max_retries: match lookup("RATE_LIMIT_MAX_RETRIES") {
                Some(raw) if !raw.trim().is_empty() => {
                    Some(parse_num("RATE_LIMIT_MAX_RETRIES", Some(raw), 0u32)?)
                }
                _ => None,
            },
            http_timeout: Duration::from_secs(parse_num(
                "HTTP_TIMEOUT_SECS",
                lookup("HTTP_TIMEOUT_SECS"),
                HTTP_TIMEOUT_SECS,
            )?),
            log_level: var("LOG_LEVEL", "info"),
        })
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} must be a non-negative integer, got {s:?}"))),
    }
}
