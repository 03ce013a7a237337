use super::{get_text, parse_decimal};
use crate::errors::Result;
use crate::models::ExchangeId;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const BINANCE_TICKER_ENDPOINT: &str = "https://api.binance.com/api/v3/ticker/price";

#[derive(Debug, Deserialize)]
struct TickerPrice {
    #[serde(rename = "symbol")]
    _symbol: String,
    price: String,
}

pub fn ticker_url(symbol: &str) -> Result<Url> {
    Ok(Url::parse_with_params(BINANCE_TICKER_ENDPOINT, &[("symbol", symbol)])?)
}

/// Extract the price from a `/api/v3/ticker/price` response.
pub fn parse_price(raw: &str) -> Result<f64> {
    let ticker: TickerPrice = serde_json::from_str(raw)?;
    parse_decimal(ExchangeId::Binance, &ticker.price)
}

/// Last price for a Binance symbol, e.g. "BTCUSDT".
pub async fn fetch_price(client: &Client, symbol: &str) -> Result<f64> {
    let body = get_text(client, ticker_url(symbol)?).await?;
    parse_price(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ticker_price() {
        let raw = r#"{"symbol":"BTCUSDT","price":"64123.45000000"}"#;
        assert_eq!(parse_price(raw).unwrap(), 64123.45);
    }

    #[test]
    fn error_payload_is_rejected() {
        let raw = r#"{"code":-1121,"msg":"Invalid symbol."}"#;
        assert!(parse_price(raw).is_err());
    }

    #[test]
    fn url_carries_symbol() {
        let url = ticker_url("ETHUSDT").unwrap();
        assert_eq!(url.as_str(), "https://api.binance.com/api/v3/ticker/price?symbol=ETHUSDT");
    }
}
