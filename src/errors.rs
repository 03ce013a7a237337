use thiserror::Error;

use crate::models::ExchangeId;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid token '{0}': expected <BASE>USDT")]
    InvalidToken(String),

    #[error("Unknown exchange: {0}")]
    UnknownExchange(String),

    #[error("No data from {exchange}: {reason}")]
    DataUnavailable {
        exchange: ExchangeId,
        reason: String,
    },

    #[error("Request to {exchange} timed out after {millis}ms")]
    Timeout { exchange: ExchangeId, millis: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Notification error: {0}")]
    Notification(String),
}
