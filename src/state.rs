//! Last published evaluation results, shared with the query surface.
//!
//! The evaluation loop builds a complete [`Published`] value off to the side
//! and swaps it in with a single `watch` send, so readers always see a
//! snapshot, opportunity list and stats from the same cycle.

use crate::arbitrage::{ArbitrageOpportunity, Stats};
use crate::models::PriceSnapshot;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Results of one completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Published {
    /// Sequence number of the cycle, starting at 1.
    pub cycle: u64,
    pub prices: PriceSnapshot,
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub stats: Stats,
}

#[derive(Debug)]
pub struct SharedState {
    tx: watch::Sender<Arc<Published>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Published::default()));
        Self { tx }
    }

    /// Replace the previous results atomically.
    pub fn publish(&self, published: Published) {
        self.tx.send_replace(Arc::new(published));
    }

    /// Everything from the latest cycle; the lock is held only for the clone.
    pub fn latest(&self) -> Arc<Published> {
        self.tx.borrow().clone()
    }

    pub fn prices(&self) -> PriceSnapshot {
        self.latest().prices.clone()
    }

    pub fn opportunities(&self) -> Vec<ArbitrageOpportunity> {
        self.latest().opportunities.clone()
    }

    pub fn stats(&self) -> Stats {
        self.latest().stats.clone()
    }
}
