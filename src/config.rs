//! Configuration loader and application settings.

use crate::arbitrage::{ArbitrageConfig, FeeRouteModel, TransferFees};
use crate::errors::{AppError, Result};
use crate::models::{ExchangeId, Token};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// On-disk shape of `config.json`. Absent fields take the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FileConfig {
    min_profit_usd: f64,
    commission: f64,
    tokens: Vec<Token>,
    min_trade_volume: f64,
    max_trade_volume: f64,
    bank_limit: f64,
    poll_interval_sec: u64,
    fetch_timeout_ms: u64,
    /// route token -> { "<exchange>_withdraw" | "<exchange>_deposit": fee }
    transfer_fees: HashMap<String, HashMap<String, f64>>,
    /// route token -> exchange -> network label
    transfer_networks: HashMap<String, HashMap<String, String>>,
    /// base asset -> ordered route tokens
    transfer_routes: HashMap<String, Vec<String>>,
    telegram_token: String,
    telegram_chat_id: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            min_profit_usd: 10.0,
            commission: 0.2,
            tokens: Token::parse("BTCUSDT").into_iter().collect(),
            min_trade_volume: 50.0,
            max_trade_volume: 10_000.0,
            bank_limit: 5000.0,
            poll_interval_sec: 5,
            fetch_timeout_ms: 5000,
            transfer_fees: HashMap::new(),
            transfer_networks: HashMap::new(),
            transfer_routes: HashMap::new(),
            telegram_token: String::new(),
            telegram_chat_id: String::new(),
        }
    }
}

/// Telegram bot credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub arbitrage: ArbitrageConfig,
    pub tokens: Vec<Token>,
    /// Sleep between the end of one cycle and the start of the next.
    pub poll_interval: Duration,
    /// Upper bound for a single exchange price request.
    pub fetch_timeout: Duration,
    pub model: FeeRouteModel,
    pub telegram: Option<TelegramConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::assemble(FileConfig::default(), HashMap::new(), HashMap::new())
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: FileConfig = serde_json::from_str(raw)?;
        Self::from_file_config(file)
    }

    /// Load `path`, falling back to the built-in defaults on any failure.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "[INIT] config unavailable, using defaults");
                Self::default()
            }
        }
    }

    fn from_file_config(mut file: FileConfig) -> Result<Self> {
        if file.tokens.is_empty() {
            return Err(AppError::Config("token list is empty".into()));
        }
        if file.poll_interval_sec == 0 {
            return Err(AppError::Config("poll_interval_sec must be positive".into()));
        }
        if file.fetch_timeout_ms == 0 {
            return Err(AppError::Config("fetch_timeout_ms must be positive".into()));
        }
        if file.bank_limit <= 0.0 {
            return Err(AppError::Config("bank_limit must be positive".into()));
        }

        // Asset keys match `Token::base()`, which is always upper case.
        let mut fees = HashMap::new();
        for (route_token, raw) in std::mem::take(&mut file.transfer_fees) {
            fees.insert(asset_key(&route_token), parse_fee_table(&raw)?);
        }

        let mut networks = HashMap::new();
        for (route_token, raw) in std::mem::take(&mut file.transfer_networks) {
            let mut by_exchange = HashMap::with_capacity(raw.len());
            for (exchange, label) in raw {
                by_exchange.insert(exchange.parse::<ExchangeId>()?, label);
            }
            networks.insert(asset_key(&route_token), by_exchange);
        }

        file.transfer_routes = std::mem::take(&mut file.transfer_routes)
            .into_iter()
            .map(|(base, routes)| {
                let routes = routes.iter().map(|r| asset_key(r)).collect();
                (asset_key(&base), routes)
            })
            .collect();

        Ok(Self::assemble(file, fees, networks))
    }

    fn assemble(
        file: FileConfig,
        fees: HashMap<String, TransferFees>,
        networks: HashMap<String, HashMap<ExchangeId, String>>,
    ) -> Self {
        let telegram = if file.telegram_token.is_empty() || file.telegram_chat_id.is_empty() {
            None
        } else {
            Some(TelegramConfig {
                token: file.telegram_token,
                chat_id: file.telegram_chat_id,
            })
        };

        Self {
            arbitrage: ArbitrageConfig {
                min_profit_usd: file.min_profit_usd,
                commission_percent: file.commission,
                min_trade_volume: file.min_trade_volume,
                max_trade_volume: file.max_trade_volume,
                bank_limit_usd: file.bank_limit,
            },
            tokens: file.tokens,
            poll_interval: Duration::from_secs(file.poll_interval_sec),
            fetch_timeout: Duration::from_millis(file.fetch_timeout_ms),
            model: FeeRouteModel::new(fees, networks, file.transfer_routes),
            telegram,
        }
    }
}

fn asset_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Convert the flat `binance_withdraw` / `okx_deposit` keys into a table.
fn parse_fee_table(raw: &HashMap<String, f64>) -> Result<TransferFees> {
    let mut table = TransferFees::new();
    for (key, &fee) in raw {
        let (exchange, kind) = key
            .rsplit_once('_')
            .ok_or_else(|| AppError::Config(format!("unrecognized fee key '{key}'")))?;
        let exchange: ExchangeId = exchange.parse()?;
        match kind {
            "withdraw" => table.set_withdraw(exchange, fee),
            "deposit" => table.set_deposit(exchange, fee),
            _ => return Err(AppError::Config(format!("unrecognized fee key '{key}'"))),
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::run_cycle;
    use crate::models::PriceSnapshot;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.arbitrage.min_profit_usd, 10.0);
        assert_eq!(cfg.arbitrage.commission_percent, 0.2);
        assert_eq!(cfg.arbitrage.min_trade_volume, 50.0);
        assert_eq!(cfg.arbitrage.max_trade_volume, 10_000.0);
        assert_eq!(cfg.arbitrage.bank_limit_usd, 5000.0);
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.tokens, vec![Token::parse("BTCUSDT").unwrap()]);
        assert!(cfg.model.fees_for("BTC").is_none());
        assert!(cfg.telegram.is_none());
    }

    #[test]
    fn parses_full_file() {
        let raw = r#"{
            "min_profit_usd": 5,
            "commission": 0.1,
            "tokens": ["BTCUSDT", "ethusdt"],
            "min_trade_volume": 0.01,
            "max_trade_volume": 100,
            "bank_limit": 2000,
            "poll_interval_sec": 30,
            "transfer_fees": {
                "BTC": { "binance_withdraw": 0.0002, "okx_deposit": 0.0001 }
            },
            "transfer_networks": { "BTC": { "binance": "BTC", "okx": "Bitcoin" } },
            "transfer_routes": { "ETH": ["USDT", "ETH"] },
            "telegram_token": "123:abc",
            "telegram_chat_id": "42"
        }"#;
        let cfg = AppConfig::from_json(raw).unwrap();
        assert_eq!(cfg.tokens.len(), 2);
        assert_eq!(cfg.tokens[1].base(), "ETH");
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.fetch_timeout, Duration::from_millis(5000));
        let btc = cfg.model.fees_for("BTC").unwrap();
        assert_eq!(btc.withdraw_fee(ExchangeId::Binance), 0.0002);
        assert_eq!(btc.deposit_fee(ExchangeId::Okx), 0.0001);
        assert_eq!(btc.withdraw_fee(ExchangeId::Kucoin), 0.0);
        assert_eq!(cfg.model.network("BTC", ExchangeId::Okx), "Bitcoin");
        assert_eq!(cfg.model.routes_for("ETH"), vec!["USDT", "ETH"]);
        assert_eq!(
            cfg.telegram,
            Some(TelegramConfig {
                token: "123:abc".into(),
                chat_id: "42".into()
            })
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = AppConfig::from_json(r#"{ "min_profit_usd": 1.5 }"#).unwrap();
        assert_eq!(cfg.arbitrage.min_profit_usd, 1.5);
        assert_eq!(cfg.arbitrage.bank_limit_usd, 5000.0);
        assert_eq!(cfg.tokens.len(), 1);
    }

    #[test]
    fn rejects_malformed_tokens_and_exchanges() {
        assert!(AppConfig::from_json(r#"{ "tokens": ["USDT"] }"#).is_err());
        assert!(AppConfig::from_json(r#"{ "tokens": ["BTCEUR"] }"#).is_err());
        let unknown_exchange = r#"{ "transfer_fees": { "BTC": { "kraken_withdraw": 1 } } }"#;
        assert!(matches!(
            AppConfig::from_json(unknown_exchange),
            Err(AppError::UnknownExchange(_))
        ));
        let bad_kind = r#"{ "transfer_fees": { "BTC": { "binance_fee": 1 } } }"#;
        assert!(matches!(AppConfig::from_json(bad_kind), Err(AppError::Config(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_or_default("/nonexistent/definitely/config.json");
        assert_eq!(cfg.arbitrage.min_profit_usd, 10.0);
        assert_eq!(cfg.tokens[0].to_string(), "BTCUSDT");
    }

    #[test]
    fn telegram_needs_both_credentials() {
        let cfg = AppConfig::from_json(r#"{ "telegram_token": "t" }"#).unwrap();
        assert!(cfg.telegram.is_none());
    }

    #[test]
    fn asset_keys_are_case_insensitive() {
        let raw = r#"{
            "tokens": ["pepeusdt"],
            "min_trade_volume": 0.1,
            "bank_limit": 1000,
            "transfer_fees": { "eth": { "binance_withdraw": 0.01 } },
            "transfer_networks": { "eth": { "binance": "ERC20" } },
            "transfer_routes": { "pepe": ["usdc", " eth"] }
        }"#;
        let cfg = AppConfig::from_json(raw).unwrap();
        assert_eq!(cfg.model.fees_for("ETH").unwrap().withdraw_fee(ExchangeId::Binance), 0.01);
        assert_eq!(cfg.model.network("ETH", ExchangeId::Binance), "ERC20");
        assert_eq!(cfg.model.routes_for("PEPE"), vec!["USDC", "ETH"]);

        let mut snapshot = PriceSnapshot::new();
        snapshot.insert(&cfg.tokens[0], ExchangeId::Binance, 100.0);
        snapshot.insert(&cfg.tokens[0], ExchangeId::Kucoin, 102.0);
        let report = run_cycle(&cfg.tokens, &snapshot, &cfg.model, &cfg.arbitrage);
        assert_eq!(report.pairs_evaluated, 2);
        assert_eq!(report.skipped.no_fee_data, 2);
        assert_eq!(report.routes_checked, 2);
    }
}
