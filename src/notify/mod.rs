//! Opportunity notifications.

pub mod telegram;

use crate::arbitrage::{ArbitrageOpportunity, FeeRouteModel};
use crate::errors::Result;
use async_trait::async_trait;

pub use telegram::TelegramNotifier;

/// Delivery target for newly found opportunities.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, opportunity: &ArbitrageOpportunity, guide: &str) -> Result<()>;
}

/// Step-by-step instructions for acting on an opportunity by hand.
pub fn build_guide(
    opp: &ArbitrageOpportunity,
    model: &FeeRouteModel,
    commission_percent: f64,
) -> String {
    let net_from = model.network(&opp.route_token, opp.source_exchange);
    let net_to = model.network(&opp.route_token, opp.dest_exchange);
    format!(
        "STEPS:\n\
         1. Buy {token} on {src} at {src_price:.2} USDT.\n\
         2. Transfer {route} from {src} to {dst} over network {net_from}->{net_to}.\n   \
         Withdrawal fee: {fee:.6} {route}.\n\
         3. Wait for the deposit to arrive.\n\
         4. Sell {token} on {dst} at {dst_price:.2} USDT.\n\
         5. Account for the exchange commission: {commission:.2}%.\n\
         WARNING: double-check the destination address and network before sending!",
        token = opp.token,
        src = opp.source_exchange,
        dst = opp.dest_exchange,
        src_price = opp.source_price,
        dst_price = opp.dest_price,
        route = opp.route_token,
        fee = opp.withdraw_fee,
        commission = commission_percent,
    )
}
