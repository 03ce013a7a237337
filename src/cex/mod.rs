//! CEX REST price sources.
//!
//! Responsibilities:
//! • Fetch the last traded price of a token on each supported exchange.
//! • Run every (token, exchange) request concurrently under a hard timeout.
//! • Degrade failures to "no data" for that pair only.

pub mod binance;
pub mod bybit;
pub mod huobi;
pub mod kucoin;
pub mod okx;

use crate::errors::{AppError, Result};
use crate::models::{ExchangeId, PriceSnapshot, Token};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Anything that can quote a spot price for a token on an exchange.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Returns a strictly positive price in USDT per base unit.
    async fn fetch_price(&self, exchange: ExchangeId, token: &Token) -> Result<f64>;
}

/// Public REST endpoints of all supported exchanges over one HTTP client.
#[derive(Debug, Clone)]
pub struct RestPriceSource {
    client: Client,
}

impl RestPriceSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PriceSource for RestPriceSource {
    async fn fetch_price(&self, exchange: ExchangeId, token: &Token) -> Result<f64> {
        let symbol = exchange.symbol_for(token);
        let price = match exchange {
            ExchangeId::Binance => binance::fetch_price(&self.client, &symbol).await?,
            ExchangeId::Kucoin => kucoin::fetch_price(&self.client, &symbol).await?,
            ExchangeId::Bybit => bybit::fetch_price(&self.client, &symbol).await?,
            ExchangeId::Okx => okx::fetch_price(&self.client, &symbol).await?,
            ExchangeId::Huobi => huobi::fetch_price(&self.client, &symbol).await?,
        };
        ensure_positive(exchange, price)
    }
}

/// Collect prices for every token on every exchange.
///
/// Requests are dispatched together and each is cut off after `timeout`, so
/// one slow venue costs at most `timeout` for the whole round.
pub async fn fetch_snapshot(
    source: &dyn PriceSource,
    tokens: &[Token],
    timeout: Duration,
) -> PriceSnapshot {
    let requests = tokens
        .iter()
        .flat_map(|token| ExchangeId::ALL.into_iter().map(move |ex| (token, ex)))
        .map(|(token, exchange)| async move {
            let fetch = source.fetch_price(exchange, token);
            let result = match tokio::time::timeout(timeout, fetch).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout {
                    exchange,
                    millis: timeout.as_millis() as u64,
                }),
            };
            (token, exchange, result)
        });

    let mut snapshot = PriceSnapshot::new();
    for token in tokens {
        snapshot.ensure_token(token);
    }
    for (token, exchange, result) in join_all(requests).await {
        let symbol = token.to_string();
        match result {
            Ok(price) if snapshot.insert(token, exchange, price) => {
                debug!(token = %symbol, exchange = exchange.as_str(), price, "[PRICE] quote");
            }
            Ok(price) => {
                warn!(token = %symbol, exchange = exchange.as_str(), price, "[PRICE] unusable quote discarded");
            }
            Err(e) => {
                warn!(token = %symbol, exchange = exchange.as_str(), error = %e, "[PRICE] fetch failed");
            }
        }
    }
    snapshot
}

async fn get_text(client: &Client, url: Url) -> Result<String> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    Ok(body)
}

/// Parse a decimal string as returned by most exchange APIs.
fn parse_decimal(exchange: ExchangeId, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| AppError::DataUnavailable {
            exchange,
            reason: format!("bad price '{raw}': {e}"),
        })
}

fn ensure_positive(exchange: ExchangeId, price: f64) -> Result<f64> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(AppError::DataUnavailable {
            exchange,
            reason: format!("non-positive price {price}"),
        })
    }
}
