use super::{get_text, parse_decimal};
use crate::errors::{AppError, Result};
use crate::models::ExchangeId;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const OKX_TICKER_ENDPOINT: &str = "https://www.okx.com/api/v5/market/ticker";

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    data: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    last: String,
}

pub fn ticker_url(inst_id: &str) -> Result<Url> {
    Ok(Url::parse_with_params(OKX_TICKER_ENDPOINT, &[("instId", inst_id)])?)
}

pub fn parse_price(raw: &str) -> Result<f64> {
    let resp: TickerResponse = serde_json::from_str(raw)?;
    let ticker = resp.data.first().ok_or_else(|| AppError::DataUnavailable {
        exchange: ExchangeId::Okx,
        reason: "empty ticker data".into(),
    })?;
    parse_decimal(ExchangeId::Okx, &ticker.last)
}

/// Last price for an OKX instrument, e.g. "BTC-USDT".
pub async fn fetch_price(client: &Client, inst_id: &str) -> Result<f64> {
    let body = get_text(client, ticker_url(inst_id)?).await?;
    parse_price(&body)
}
