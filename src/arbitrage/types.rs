use crate::models::{ExchangeId, Token};
use serde::Serialize;

/// Configuration for arbitrage calculations
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageConfig {
    /// Profit must strictly exceed this many USD to be reported.
    pub min_profit_usd: f64,
    /// Trading commission charged on the sell leg, in percent.
    pub commission_percent: f64,
    /// Volume floor in base-asset units.
    pub min_trade_volume: f64,
    /// Volume ceiling in base-asset units.
    pub max_trade_volume: f64,
    /// USD capital available per trade.
    pub bank_limit_usd: f64,
}

/// Profitable transfer of a token from one exchange to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageOpportunity {
    pub token: Token,
    pub source_exchange: ExchangeId,
    pub dest_exchange: ExchangeId,
    pub route_token: String,
    /// Base-asset units bought on the source exchange.
    pub volume: f64,
    /// Net USD profit after all fees.
    pub profit: f64,
    pub source_price: f64,
    pub dest_price: f64,
    /// In route-token units.
    pub withdraw_fee: f64,
    /// In route-token units.
    pub deposit_fee: f64,
}

impl ArbitrageOpportunity {
    /// One-line description used in logs and notifications.
    pub fn summary(&self) -> String {
        format!(
            "{} -> {} via {}. {} volume: {:.4}, profit: {:.2} USD (fees included)",
            self.source_exchange,
            self.dest_exchange,
            self.route_token,
            self.token,
            self.volume,
            self.profit
        )
    }
}

/// Result of evaluating one (token, exchange pair, route token) triple.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// No fee table configured for the route token.
    NoFeeData,
    /// Bank-limited volume fell under the configured minimum.
    InsufficientVolume { cap: f64 },
    /// The withdrawal fee consumed the whole volume.
    NothingAfterWithdraw { volume: f64 },
    /// Nothing left to deliver after converting through the route token.
    NothingAfterConversion { volume: f64 },
    /// Fully priced but not above the profit threshold.
    InsufficientProfit { profit: f64 },
    Opportunity(ArbitrageOpportunity),
}

impl RouteOutcome {
    /// Whether the triple made it through the full profit calculation.
    pub fn is_checked(&self) -> bool {
        matches!(
            self,
            RouteOutcome::InsufficientProfit { .. } | RouteOutcome::Opportunity(_)
        )
    }
}
