use super::cycle::CycleReport;
use serde::Serialize;

/// Session-wide counters. Never reset while the process runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub routes_checked: u64,
    pub opportunities_found: u64,
    pub cumulative_profit: f64,
    pub max_profit: f64,
}

impl Stats {
    /// Fold one cycle's results into the running totals.
    pub fn record(&mut self, report: &CycleReport) {
        self.routes_checked += report.routes_checked;
        for opp in &report.opportunities {
            self.opportunities_found += 1;
            self.cumulative_profit += opp.profit;
            if opp.profit > self.max_profit {
                self.max_profit = opp.profit;
            }
        }
    }
}
