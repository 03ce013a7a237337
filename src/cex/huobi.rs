use super::get_text;
use crate::errors::{AppError, Result};
use crate::models::ExchangeId;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const HUOBI_MERGED_ENDPOINT: &str = "https://api.huobi.pro/market/detail/merged";

#[derive(Debug, Deserialize)]
struct MergedResponse {
    tick: Option<MergedTick>,
}

#[derive(Debug, Deserialize)]
struct MergedTick {
    close: f64,
}

pub fn ticker_url(symbol: &str) -> Result<Url> {
    Ok(Url::parse_with_params(HUOBI_MERGED_ENDPOINT, &[("symbol", symbol)])?)
}

/// Huobi reports the close as a JSON number rather than a string.
pub fn parse_price(raw: &str) -> Result<f64> {
    let resp: MergedResponse = serde_json::from_str(raw)?;
    resp.tick
        .map(|tick| tick.close)
        .ok_or_else(|| AppError::DataUnavailable {
            exchange: ExchangeId::Huobi,
            reason: "missing tick".into(),
        })
}

/// Last price for a Huobi symbol, e.g. "btcusdt".
pub async fn fetch_price(client: &Client, symbol: &str) -> Result<f64> {
    let body = get_text(client, ticker_url(symbol)?).await?;
    parse_price(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_close() {
        let raw = r#"{"ch":"market.btcusdt.detail.merged","status":"ok","tick":{"close":64010.01,"open":63000}}"#;
        assert_eq!(parse_price(raw).unwrap(), 64010.01);
    }

    #[test]
    fn error_status_has_no_tick() {
        let raw = r#"{"status":"error","err-code":"invalid-parameter","err-msg":"invalid symbol"}"#;
        assert!(matches!(parse_price(raw), Err(AppError::DataUnavailable { .. })));
    }
}
