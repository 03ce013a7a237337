//! Aggregator logic for evaluating arbitrage opportunities.

use crate::{
    arbitrage::{CycleReport, Stats, run_cycle},
    cex::{PriceSource, fetch_snapshot},
    config::AppConfig,
    notify::{NotificationSink, build_guide},
    state::{Published, SharedState},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const STATS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Owns everything one evaluation cycle needs.
pub struct Aggregator {
    config: Arc<AppConfig>,
    source: Arc<dyn PriceSource>,
    notifier: Option<Arc<dyn NotificationSink>>,
    state: Arc<SharedState>,
    stats: Stats,
    cycle: u64,
}

impl Aggregator {
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<dyn PriceSource>,
        notifier: Option<Arc<dyn NotificationSink>>,
        state: Arc<SharedState>,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            state,
            stats: Stats::default(),
            cycle: 0,
        }
    }

    /// Fetch, evaluate, publish, notify.
    pub async fn run_once(&mut self) -> CycleReport {
        let cfg = &self.config;
        let snapshot = fetch_snapshot(self.source.as_ref(), &cfg.tokens, cfg.fetch_timeout).await;
        for token in snapshot.tokens() {
            if let Some(prices) = snapshot.prices_for(token) {
                info!(token = %token, ?prices, "[PRICE] snapshot");
            }
        }

        let report = run_cycle(&cfg.tokens, &snapshot, &cfg.model, &cfg.arbitrage);
        self.stats.record(&report);
        self.cycle += 1;

        self.state.publish(Published {
            cycle: self.cycle,
            prices: snapshot,
            opportunities: report.opportunities.clone(),
            stats: self.stats.clone(),
        });

        info!(
            cycle = self.cycle,
            pairs = report.pairs_evaluated,
            routes_checked = report.routes_checked,
            found = report.opportunities.len(),
            no_fee_data = report.skipped.no_fee_data,
            insufficient_volume = report.skipped.insufficient_volume,
            insufficient_profit = report.skipped.insufficient_profit,
            "[CYCLE] evaluated"
        );

        for opp in &report.opportunities {
            info!(profit = opp.profit, volume = opp.volume, "[OPP] {}", opp.summary());
            if let Some(notifier) = &self.notifier {
                let guide = build_guide(opp, &cfg.model, cfg.arbitrage.commission_percent);
                if let Err(e) = notifier.notify(opp, &guide).await {
                    warn!(error = %e, "[NOTIFY] delivery failed");
                }
            }
        }

        report
    }

    fn log_stats(&self) {
        info!(
            routes_checked = self.stats.routes_checked,
            opportunities_found = self.stats.opportunities_found,
            cumulative_profit = self.stats.cumulative_profit,
            max_profit = self.stats.max_profit,
            "[STATS] session"
        );
    }
}

/// Spawn the main arbitrage evaluation loop.
///
/// Each cycle starts `poll_interval` after the previous one finished.
pub fn spawn_arbitrage_evaluator(mut aggregator: Aggregator) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_stats_log = Instant::now();
        loop {
            aggregator.run_once().await;
            if last_stats_log.elapsed() > STATS_LOG_INTERVAL {
                aggregator.log_stats();
                last_stats_log = Instant::now();
            }
            tokio::time::sleep(aggregator.config.poll_interval).await;
        }
    })
}
