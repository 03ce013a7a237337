use super::{get_text, parse_decimal};
use crate::errors::{AppError, Result};
use crate::models::ExchangeId;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const KUCOIN_LEVEL1_ENDPOINT: &str = "https://api.kucoin.com/api/v1/market/orderbook/level1";

#[derive(Debug, Deserialize)]
struct Level1Response {
    code: String,
    data: Option<Level1>,
}

#[derive(Debug, Deserialize)]
struct Level1 {
    price: String,
}

pub fn ticker_url(symbol: &str) -> Result<Url> {
    Ok(Url::parse_with_params(KUCOIN_LEVEL1_ENDPOINT, &[("symbol", symbol)])?)
}

/// Extract the last price from a level-1 order book response.
pub fn parse_price(raw: &str) -> Result<f64> {
    let resp: Level1Response = serde_json::from_str(raw)?;
    match resp.data {
        Some(level1) => parse_decimal(ExchangeId::Kucoin, &level1.price),
        None => Err(AppError::DataUnavailable {
            exchange: ExchangeId::Kucoin,
            reason: format!("empty response (code {})", resp.code),
        }),
    }
}

/// Last price for a KuCoin symbol, e.g. "BTC-USDT".
pub async fn fetch_price(client: &Client, symbol: &str) -> Result<f64> {
    let body = get_text(client, ticker_url(symbol)?).await?;
    parse_price(&body)
}
