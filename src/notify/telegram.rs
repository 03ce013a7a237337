use super::NotificationSink;
use crate::arbitrage::ArbitrageOpportunity;
use crate::config::TelegramConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Sends opportunities to a chat through the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    endpoint: Url,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, cfg: &TelegramConfig) -> Result<Self> {
        Self::with_api_base(client, cfg, TELEGRAM_API)
    }

    pub(crate) fn with_api_base(client: Client, cfg: &TelegramConfig, api: &str) -> Result<Self> {
        let endpoint = Url::parse(&format!("{api}/bot{}/sendMessage", cfg.token))?;
        Ok(Self {
            client,
            endpoint,
            chat_id: cfg.chat_id.clone(),
        })
    }
}

/// Message body: the summary line followed by the guide.
pub fn message_text(opportunity: &ArbitrageOpportunity, guide: &str) -> String {
    format!("{}\n{}", opportunity.summary(), guide)
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    /// Errors never carry the request URL, which embeds the bot token.
    async fn notify(&self, opportunity: &ArbitrageOpportunity, guide: &str) -> Result<()> {
        let text = message_text(opportunity, guide);
        let resp = self
            .client
            .post(self.endpoint.clone())
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;
        if resp.status() != StatusCode::OK {
            return Err(AppError::Notification(format!("telegram error: {}", resp.status())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExchangeId, Token};

    #[test]
    fn endpoint_embeds_bot_token() {
        let cfg = TelegramConfig {
            token: "123:abc".into(),
            chat_id: "42".into(),
        };
        let notifier = TelegramNotifier::new(Client::new(), &cfg).unwrap();
        assert_eq!(
            notifier.endpoint.as_str(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert_eq!(notifier.chat_id, "42");
    }

    fn opportunity() -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            token: Token::parse("BTCUSDT").unwrap(),
            source_exchange: ExchangeId::Binance,
            dest_exchange: ExchangeId::Bybit,
            route_token: "BTC".into(),
            volume: 0.5,
            profit: 25.456,
            source_price: 100.0,
            dest_price: 102.0,
            withdraw_fee: 0.0002,
            deposit_fee: 0.0,
        }
    }

    #[test]
    fn message_starts_with_summary() {
        let text = message_text(&opportunity(), "STEPS:");
        assert_eq!(
            text,
            "binance -> bybit via BTC. BTCUSDT volume: 0.5000, profit: 25.46 USD (fees included)\nSTEPS:"
        );
    }

    #[tokio::test]
    async fn delivery_errors_hide_bot_token() {
        let cfg = TelegramConfig {
            token: "999:SECRETBOTTOKEN".into(),
            chat_id: "42".into(),
        };
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let notifier = TelegramNotifier::with_api_base(client, &cfg, "http://127.0.0.1:1").unwrap();

        let err = notifier.notify(&opportunity(), "STEPS:").await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
        let rendered = format!("{err} {err:?}");
        assert!(!rendered.contains("SECRETBOTTOKEN"), "{rendered}");
    }
}
