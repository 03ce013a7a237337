use anyhow::Result;
use clap::Parser;
use spread_detector::{
    aggregator::{Aggregator, spawn_arbitrage_evaluator},
    cex::RestPriceSource,
    cli::Args,
    config::AppConfig,
    notify::{NotificationSink, TelegramNotifier},
    server,
    state::SharedState,
    utils,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();
    let args = Args::parse();

    let config = Arc::new(AppConfig::load_or_default(&args.config));
    let tokens: Vec<String> = config.tokens.iter().map(ToString::to_string).collect();
    tracing::info!(
        ?tokens,
        min_profit_usd = config.arbitrage.min_profit_usd,
        commission = config.arbitrage.commission_percent,
        bank_limit = config.arbitrage.bank_limit_usd,
        poll_secs = config.poll_interval.as_secs(),
        fetch_timeout_ms = config.fetch_timeout.as_millis() as u64,
        "[INIT] spread-detector starting"
    );

    let source = RestPriceSource::new(config.fetch_timeout)?;

    let notifier: Option<Arc<dyn NotificationSink>> = match &config.telegram {
        Some(tg) => {
            let client = reqwest::Client::builder().timeout(config.fetch_timeout).build()?;
            tracing::info!("[INIT] telegram notifications enabled");
            Some(Arc::new(TelegramNotifier::new(client, tg)?))
        }
        None => None,
    };

    let state = Arc::new(SharedState::new());

    let api_task = tokio::spawn(server::serve(args.listen_addr(), state.clone()));
    let eval_task = spawn_arbitrage_evaluator(Aggregator::new(
        config.clone(),
        Arc::new(source),
        notifier,
        state,
    ));

    // Neither task finishes on its own; bail out if the API dies.
    tokio::select! {
        res = api_task => res??,
        res = eval_task => res?,
    }
    Ok(())
}
