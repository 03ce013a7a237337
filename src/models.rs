//! Shared data structures used throughout the application.

use crate::errors::{AppError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Quote asset every configured token is priced in.
pub const QUOTE_ASSET: &str = "USDT";

/// Spot trading pair, e.g. `BTCUSDT` = base `BTC` priced in `USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token {
    base: String,
    quote: String,
}

impl Token {
    /// Parse a concatenated symbol such as `ETHUSDT`.
    ///
    /// The symbol must end with [`QUOTE_ASSET`] and leave a non-empty base.
    pub fn parse(symbol: &str) -> Result<Self> {
        let symbol = symbol.trim().to_uppercase();
        match symbol.strip_suffix(QUOTE_ASSET) {
            Some(base) if !base.is_empty() => Ok(Self {
                base: base.to_string(),
                quote: QUOTE_ASSET.to_string(),
            }),
            _ => Err(AppError::InvalidToken(symbol)),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Token::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Supported centralized exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Binance,
    Kucoin,
    Bybit,
    Okx,
    Huobi,
}

impl ExchangeId {
    /// Canonical iteration order.
    pub const ALL: [ExchangeId; 5] = [
        ExchangeId::Binance,
        ExchangeId::Kucoin,
        ExchangeId::Bybit,
        ExchangeId::Okx,
        ExchangeId::Huobi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Binance => "binance",
            ExchangeId::Kucoin => "kucoin",
            ExchangeId::Bybit => "bybit",
            ExchangeId::Okx => "okx",
            ExchangeId::Huobi => "huobi",
        }
    }

    /// Market symbol in the form this exchange's REST API expects.
    pub fn symbol_for(&self, token: &Token) -> String {
        match self {
            ExchangeId::Binance | ExchangeId::Bybit => token.to_string(),
            ExchangeId::Kucoin | ExchangeId::Okx => format!("{}-{}", token.base(), token.quote()),
            ExchangeId::Huobi => token.to_string().to_lowercase(),
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ExchangeId::ALL
            .into_iter()
            .find(|ex| ex.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::UnknownExchange(s.to_string()))
    }
}

/// Per-token, per-exchange prices collected during one evaluation cycle.
///
/// Only strictly positive, finite prices are ever stored; a missing entry is
/// the sole "no data" signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSnapshot {
    prices: BTreeMap<Token, BTreeMap<ExchangeId, f64>>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token so it shows up in the snapshot even with no prices.
    pub fn ensure_token(&mut self, token: &Token) {
        self.prices.entry(token.clone()).or_default();
    }

    /// Record a price. Returns `false` (and stores nothing) for non-positive
    /// or non-finite values.
    pub fn insert(&mut self, token: &Token, exchange: ExchangeId, price: f64) -> bool {
        if !(price.is_finite() && price > 0.0) {
            return false;
        }
        self.prices
            .entry(token.clone())
            .or_default()
            .insert(exchange, price);
        true
    }

    pub fn price(&self, token: &Token, exchange: ExchangeId) -> Option<f64> {
        self.prices.get(token)?.get(&exchange).copied()
    }

    pub fn prices_for(&self, token: &Token) -> Option<&BTreeMap<ExchangeId, f64>> {
        self.prices.get(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.prices.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.values().all(BTreeMap::is_empty)
    }
}
