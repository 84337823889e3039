use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{Config, COUNTRY, CURRENCY, USER_AGENT};
use crate::error::{FetchError, Result};

/// Anything that can price a single catalog item.
#[allow(async_fn_in_trait)]
pub trait PriceSource {
    async fn fetch_price(&self, id: &str) -> std::result::Result<f64, FetchError>;
}

/// How long to back off after a 429 and how many times to try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub cooldown: Duration,
    /// Retries after the first attempt. None = keep retrying until upstream relents.
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    fn exhausted(&self, attempts: u32) -> bool {
        self.max_retries.is_some_and(|max| attempts > max)
    }
}

const BRL_PREFIX: &str = "R$";

/// Subset of the `priceoverview` response we care about.
#[derive(Debug, Deserialize)]
struct PriceOverview {
    lowest_price: Option<String>,
}

/// Looks up the lowest listed price of one market item per call.
pub struct PriceFetcher {
    client: reqwest::Client,
    url: String,
    currency: String,
    app_id: String,
    retry: RetryPolicy,
}

impl PriceFetcher {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.http_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: cfg.price_api_url.clone(),
            currency: CURRENCY.to_string(),
            app_id: cfg.app_id.to_string(),
            retry: RetryPolicy {
                cooldown: cfg.rate_limit_cooldown,
                max_retries: cfg.rate_limit_max_retries,
            },
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch the current lowest price for `id`. HTTP 429 is retried after the
    /// cooldown; every other failure is returned as a [`FetchError`].
    pub async fn fetch(&self, id: &str) -> std::result::Result<f64, FetchError> {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let resp = self
                .client
                .get(&self.url)
                .query(&[
                    ("country", COUNTRY),
                    ("currency", self.currency.as_str()),
                    ("appid", self.app_id.as_str()),
                    ("market_hash_name", id),
                ])
                .send()
                .await?;

            let status = resp.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if self.retry.exhausted(attempts) {
                    return Err(FetchError::RateLimited { attempts });
                }
                warn!(
                    item = id,
                    attempts,
                    "Rate limited, retrying in {:.1}s",
                    self.retry.cooldown.as_secs_f64()
                );
                tokio::time::sleep(self.retry.cooldown).await;
                continue;
            }
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = resp.text().await?;
            debug!(item = id, "priceoverview body: {body}");
            return price_from_body(&body);
        }
    }
}

impl PriceSource for PriceFetcher {
    async fn fetch_price(&self, id: &str) -> std::result::Result<f64, FetchError> {
        self.fetch(id).await
    }
}

fn price_from_body(body: &str) -> std::result::Result<f64, FetchError> {
    let overview: PriceOverview =
        serde_json::from_str(body).map_err(|e| FetchError::Body(e.to_string()))?;
    match overview.lowest_price {
        Some(raw) if !raw.trim().is_empty() => parse_price(&raw),
        _ => Err(FetchError::MissingPrice),
    }
}

/// Normalize a BRL price string such as `"R$ 1.234,56"` to `1234.56`.
/// The `R$` prefix is required; `.` and spaces are thousands separators and
/// `,` is the decimal mark. Any other currency is rejected.
pub fn parse_price(raw: &str) -> std::result::Result<f64, FetchError> {
    let malformed = || FetchError::MalformedPrice(raw.to_string());

    let amount = raw.trim().strip_prefix(BRL_PREFIX).ok_or_else(malformed)?;
    let amount = amount.trim_start_matches([' ', '\u{a0}']);
    if !amount.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(malformed());
    }
    let normalized: String = amount
        .trim_end()
        .chars()
        .filter(|c| !matches!(c, '.' | ' ' | '\u{a0}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let price: f64 = normalized.parse().map_err(|_| malformed())?;
    if !price.is_finite() || price < 0.0 {
        return Err(malformed());
    }
    Ok(price)
}
