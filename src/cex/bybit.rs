use super::{get_text, parse_decimal};
use crate::errors::{AppError, Result};
use crate::models::ExchangeId;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const BYBIT_TICKERS_ENDPOINT: &str = "https://api.bybit.com/v5/market/tickers";

#[derive(Debug, Deserialize)]
struct TickersResponse {
    result: TickersResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TickersResult {
    list: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    #[serde(rename = "lastPrice")]
    last_price: String,
}

pub fn ticker_url(symbol: &str) -> Result<Url> {
    Ok(Url::parse_with_params(
        BYBIT_TICKERS_ENDPOINT,
        &[("category", "spot"), ("symbol", symbol)],
    )?)
}

/// Extract the last price from a v5 spot tickers response.
pub fn parse_price(raw: &str) -> Result<f64> {
    let resp: TickersResponse = serde_json::from_str(raw)?;
    let ticker = resp.result.list.first().ok_or_else(|| AppError::DataUnavailable {
        exchange: ExchangeId::Bybit,
        reason: "empty ticker list".into(),
    })?;
    parse_decimal(ExchangeId::Bybit, &ticker.last_price)
}

/// Last price for a Bybit spot symbol, e.g. "BTCUSDT".
pub async fn fetch_price(client: &Client, symbol: &str) -> Result<f64> {
    let body = get_text(client, ticker_url(symbol)?).await?;
    parse_price(&body)
}
