//! Transfer fee tables, network labels and per-asset route candidates.

use crate::models::ExchangeId;
use std::collections::HashMap;

/// Withdrawal and deposit fees for one transferable asset, denominated in
/// that asset's own units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferFees {
    withdraw: HashMap<ExchangeId, f64>,
    deposit: HashMap<ExchangeId, f64>,
}

impl TransferFees {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_withdraw(mut self, exchange: ExchangeId, fee: f64) -> Self {
        self.withdraw.insert(exchange, fee);
        self
    }

    pub fn with_deposit(mut self, exchange: ExchangeId, fee: f64) -> Self {
        self.deposit.insert(exchange, fee);
        self
    }

    pub fn set_withdraw(&mut self, exchange: ExchangeId, fee: f64) {
        self.withdraw.insert(exchange, fee);
    }

    pub fn set_deposit(&mut self, exchange: ExchangeId, fee: f64) {
        self.deposit.insert(exchange, fee);
    }

    /// Unlisted exchanges charge nothing.
    pub fn withdraw_fee(&self, exchange: ExchangeId) -> f64 {
        self.withdraw.get(&exchange).copied().unwrap_or(0.0)
    }

    pub fn deposit_fee(&self, exchange: ExchangeId) -> f64 {
        self.deposit.get(&exchange).copied().unwrap_or(0.0)
    }
}

/// Read-only fee and routing model, built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct FeeRouteModel {
    fees: HashMap<String, TransferFees>,
    networks: HashMap<String, HashMap<ExchangeId, String>>,
    routes: HashMap<String, Vec<String>>,
}

impl FeeRouteModel {
    pub fn new(
        fees: HashMap<String, TransferFees>,
        networks: HashMap<String, HashMap<ExchangeId, String>>,
        routes: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            fees,
            networks,
            routes,
        }
    }

    /// `None` means the route token is unusable for every pair.
    pub fn fees_for(&self, route_token: &str) -> Option<&TransferFees> {
        self.fees.get(route_token)
    }

    /// Ordered route tokens to try for `base_asset`; a direct transfer of the
    /// asset itself when none are configured.
    pub fn routes_for(&self, base_asset: &str) -> Vec<String> {
        match self.routes.get(base_asset) {
            Some(routes) => routes.clone(),
            None => vec![base_asset.to_string()],
        }
    }

    /// Network label for display; empty when not configured.
    pub fn network(&self, route_token: &str, exchange: ExchangeId) -> &str {
        self.networks
            .get(route_token)
            .and_then(|by_exchange| by_exchange.get(&exchange))
            .map(String::as_str)
            .unwrap_or("")
    }
}
