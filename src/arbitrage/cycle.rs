//! One full pass over every token and directed exchange pair of a snapshot.

use super::evaluator::{PairQuote, evaluate_pair};
use super::routes::FeeRouteModel;
use super::types::{ArbitrageConfig, ArbitrageOpportunity, RouteOutcome};
use crate::models::{ExchangeId, PriceSnapshot, Token};

/// How many triples ended at each non-profitable outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub no_fee_data: u64,
    pub insufficient_volume: u64,
    pub nothing_after_withdraw: u64,
    pub nothing_after_conversion: u64,
    pub insufficient_profit: u64,
}

/// Everything one evaluation cycle produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub opportunities: Vec<ArbitrageOpportunity>,
    /// Directed pairs with both prices present.
    pub pairs_evaluated: u64,
    /// Triples that reached the profit calculation.
    pub routes_checked: u64,
    pub skipped: SkipCounts,
}

impl CycleReport {
    fn absorb(&mut self, outcome: RouteOutcome) {
        if outcome.is_checked() {
            self.routes_checked += 1;
        }
        match outcome {
            RouteOutcome::NoFeeData => self.skipped.no_fee_data += 1,
            RouteOutcome::InsufficientVolume { .. } => self.skipped.insufficient_volume += 1,
            RouteOutcome::NothingAfterWithdraw { .. } => self.skipped.nothing_after_withdraw += 1,
            RouteOutcome::NothingAfterConversion { .. } => {
                self.skipped.nothing_after_conversion += 1
            }
            RouteOutcome::InsufficientProfit { .. } => self.skipped.insufficient_profit += 1,
            RouteOutcome::Opportunity(opp) => self.opportunities.push(opp),
        }
    }
}

/// Evaluate all tokens against all ordered pairs of distinct exchanges.
///
/// Pairs missing a price on either side are not evaluated at all. Output
/// order follows `tokens`, then [`ExchangeId::ALL`] for source and
/// destination, then the configured route order.
pub fn run_cycle(
    tokens: &[Token],
    snapshot: &PriceSnapshot,
    model: &FeeRouteModel,
    config: &ArbitrageConfig,
) -> CycleReport {
    let mut report = CycleReport::default();

    for token in tokens {
        for source in ExchangeId::ALL {
            for dest in ExchangeId::ALL {
                if source == dest {
                    continue;
                }
                let (Some(source_price), Some(dest_price)) =
                    (snapshot.price(token, source), snapshot.price(token, dest))
                else {
                    continue;
                };

                report.pairs_evaluated += 1;
                let quote = PairQuote {
                    token,
                    source,
                    source_price,
                    dest,
                    dest_price,
                };
                for (_route, outcome) in evaluate_pair(&quote, model, config) {
                    report.absorb(outcome);
                }
            }
        }
    }

    report
}
