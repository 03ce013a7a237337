use super::routes::{FeeRouteModel, TransferFees};
use super::types::{ArbitrageConfig, ArbitrageOpportunity, RouteOutcome};
use crate::models::{ExchangeId, Token};
use tracing::debug;

/// Quoted prices for one directed exchange pair of a token.
///
/// Both prices are USD per base-asset unit and must be strictly positive.
#[derive(Debug, Clone, Copy)]
pub struct PairQuote<'a> {
    pub token: &'a Token,
    pub source: ExchangeId,
    pub source_price: f64,
    pub dest: ExchangeId,
    pub dest_price: f64,
}

/// Evaluate every candidate route token for a pair, in configured order.
pub fn evaluate_pair(
    quote: &PairQuote<'_>,
    model: &FeeRouteModel,
    config: &ArbitrageConfig,
) -> Vec<(String, RouteOutcome)> {
    model
        .routes_for(quote.token.base())
        .into_iter()
        .map(|route_token| {
            let outcome = evaluate_route(quote, &route_token, model.fees_for(&route_token), config);
            log_outcome(quote, &route_token, &outcome);
            (route_token, outcome)
        })
        .collect()
}

/// Price a single transfer of `quote.token` over `route_token`.
///
/// Pure function of its inputs.
pub fn evaluate_route(
    quote: &PairQuote<'_>,
    route_token: &str,
    fees: Option<&TransferFees>,
    config: &ArbitrageConfig,
) -> RouteOutcome {
    let Some(fees) = fees else {
        return RouteOutcome::NoFeeData;
    };

    let src = quote.source_price;
    let dst = quote.dest_price;

    // Capital limit converted at both legs, tighter leg wins.
    let cap = (config.bank_limit_usd / src)
        .min(config.bank_limit_usd / dst)
        .min(config.max_trade_volume);
    if cap < config.min_trade_volume {
        return RouteOutcome::InsufficientVolume { cap };
    }

    let withdraw_fee = fees.withdraw_fee(quote.source);
    let deposit_fee = fees.deposit_fee(quote.dest);

    let volume_after_withdraw = cap - withdraw_fee;
    if volume_after_withdraw <= 0.0 {
        return RouteOutcome::NothingAfterWithdraw {
            volume: volume_after_withdraw,
        };
    }

    let final_volume = if route_token != quote.token.base() {
        let converted = cap * src / dst - withdraw_fee;
        if converted <= 0.0 {
            return RouteOutcome::NothingAfterConversion { volume: converted };
        }
        converted
    } else {
        volume_after_withdraw
    };

    // Commission applies to the sell leg only.
    let usd_after_sell = final_volume * dst * (1.0 - config.commission_percent / 100.0);
    let usd_spent = cap * src + deposit_fee * dst;
    let profit = usd_after_sell - usd_spent;

    if profit > config.min_profit_usd {
        RouteOutcome::Opportunity(ArbitrageOpportunity {
            token: quote.token.clone(),
            source_exchange: quote.source,
            dest_exchange: quote.dest,
            route_token: route_token.to_string(),
            volume: cap,
            profit,
            source_price: src,
            dest_price: dst,
            withdraw_fee,
            deposit_fee,
        })
    } else {
        RouteOutcome::InsufficientProfit { profit }
    }
}

fn log_outcome(quote: &PairQuote<'_>, route_token: &str, outcome: &RouteOutcome) {
    let token = quote.token.to_string();
    let (src, dst) = (quote.source.as_str(), quote.dest.as_str());
    match outcome {
        RouteOutcome::NoFeeData => {
            debug!(%token, src, dst, route_token, "[ROUTE] no fee data")
        }
        RouteOutcome::InsufficientVolume { cap } => {
            debug!(%token, src, dst, route_token, cap, "[ROUTE] insufficient trade volume")
        }
        RouteOutcome::NothingAfterWithdraw { volume } => {
            debug!(%token, src, dst, route_token, volume, "[ROUTE] nothing left after withdrawal")
        }
        RouteOutcome::NothingAfterConversion { volume } => {
            debug!(%token, src, dst, route_token, volume, "[ROUTE] nothing left after conversion")
        }
        RouteOutcome::InsufficientProfit { profit } => {
            debug!(%token, src, dst, route_token, profit, "[ROUTE] insufficient profit")
        }
        RouteOutcome::Opportunity(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> ArbitrageConfig {
        ArbitrageConfig {
            min_profit_usd: 10.0,
            commission_percent: 0.0,
            min_trade_volume: 0.1,
            max_trade_volume: 10_000.0,
            bank_limit_usd: 1000.0,
        }
    }

    fn btc() -> Token {
        Token::parse("BTCUSDT").unwrap()
    }

    fn quote(token: &Token, source_price: f64, dest_price: f64) -> PairQuote<'_> {
        PairQuote {
            token,
            source: ExchangeId::Binance,
            source_price,
            dest: ExchangeId::Kucoin,
            dest_price,
        }
    }

    fn withdraw(fee: f64) -> TransferFees {
        TransferFees::new().with_withdraw(ExchangeId::Binance, fee)
    }

    #[test]
    fn direct_route_profit_matches_hand_calculation() {
        let t = btc();
        let q = quote(&t, 100.0, 102.0);
        let outcome = evaluate_route(&q, "BTC", Some(&withdraw(0.01)), &config());

        let cap = 1000.0 / 102.0;
        let expected = (cap - 0.01) * 102.0 - cap * 100.0;
        match outcome {
            RouteOutcome::Opportunity(opp) => {
                assert!((opp.volume - cap).abs() < 1e-12);
                assert!((opp.profit - expected).abs() < 1e-9);
                assert!((opp.profit - 18.5878).abs() < 1e-3);
                assert_eq!(opp.route_token, "BTC");
                assert_eq!(opp.source_exchange, ExchangeId::Binance);
                assert_eq!(opp.dest_exchange, ExchangeId::Kucoin);
            }
            other => panic!("expected opportunity, got {other:?}"),
        }
    }

    #[test]
    fn withdrawal_fee_larger_than_volume_is_skipped() {
        let t = btc();
        let q = quote(&t, 100.0, 102.0);
        let outcome = evaluate_route(&q, "BTC", Some(&withdraw(15.0)), &config());
        match outcome {
            RouteOutcome::NothingAfterWithdraw { volume } => {
                assert!((volume - (1000.0 / 102.0 - 15.0)).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!outcome_checked(&q, 15.0));
    }

    fn outcome_checked(q: &PairQuote<'_>, fee: f64) -> bool {
        evaluate_route(q, "BTC", Some(&withdraw(fee)), &config()).is_checked()
    }

    #[test]
    fn indirect_route_sells_converted_volume() {
        let t = btc();
        let q = quote(&t, 50.0, 55.0);
        let cfg = ArbitrageConfig {
            bank_limit_usd: 1100.0,
            min_profit_usd: -1000.0,
            ..config()
        };
        let outcome = evaluate_route(&q, "USDC", Some(&withdraw(0.5)), &cfg);
        let final_volume = 20.0_f64 * 50.0 / 55.0 - 0.5;
        assert!((final_volume - 17.6818).abs() < 1e-4);
        match outcome {
            RouteOutcome::Opportunity(opp) => {
                assert!((opp.volume - 20.0).abs() < 1e-12);
                assert!((opp.profit - (final_volume * 55.0 - 1000.0)).abs() < 1e-9);
                assert!((opp.profit + 27.5).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn indirect_route_with_nothing_after_conversion() {
        let t = btc();
        // cap = 10, converted = 10 * 100 / 1000 - 5 < 0 while cap - fee > 0
        let q = quote(&t, 100.0, 1000.0);
        let cfg = ArbitrageConfig {
            bank_limit_usd: 10_000.0,
            ..config()
        };
        let outcome = evaluate_route(&q, "USDC", Some(&withdraw(5.0)), &cfg);
        assert!(matches!(outcome, RouteOutcome::NothingAfterConversion { volume } if volume < 0.0));
    }

    #[test]
    fn missing_fee_table_is_skipped() {
        let t = btc();
        let q = quote(&t, 100.0, 102.0);
        assert_eq!(evaluate_route(&q, "BTC", None, &config()), RouteOutcome::NoFeeData);
    }

    #[test]
    fn volume_below_floor_is_skipped() {
        let t = btc();
        let q = quote(&t, 100.0, 102.0);
        let cfg = ArbitrageConfig {
            min_trade_volume: 50.0,
            ..config()
        };
        let outcome = evaluate_route(&q, "BTC", Some(&withdraw(0.0)), &cfg);
        assert!(matches!(outcome, RouteOutcome::InsufficientVolume { cap } if cap < 50.0));
    }

    #[test]
    fn volume_is_clamped_to_max_trade_volume() {
        let t = btc();
        let q = quote(&t, 1.0, 1.1);
        let cfg = ArbitrageConfig {
            max_trade_volume: 100.0,
            min_profit_usd: 0.0,
            ..config()
        };
        match evaluate_route(&q, "BTC", Some(&withdraw(0.0)), &cfg) {
            RouteOutcome::Opportunity(opp) => {
                assert_eq!(opp.volume, 100.0);
                assert!((opp.profit - 10.0).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn profit_equal_to_threshold_is_not_reported() {
        let t = btc();
        let q = quote(&t, 1.0, 1.1);
        let cfg = ArbitrageConfig {
            max_trade_volume: 100.0,
            min_profit_usd: 100.0 * 1.1 - 100.0,
            ..config()
        };
        let outcome = evaluate_route(&q, "BTC", Some(&withdraw(0.0)), &cfg);
        assert!(matches!(outcome, RouteOutcome::InsufficientProfit { .. }));
        assert!(outcome.is_checked());
    }

    #[test]
    fn commission_and_deposit_fee_reduce_profit() {
        let t = btc();
        let q = quote(&t, 100.0, 102.0);
        let fees = withdraw(0.01).with_deposit(ExchangeId::Kucoin, 0.02);
        let cfg = ArbitrageConfig {
            commission_percent: 0.2,
            min_profit_usd: 0.0,
            ..config()
        };
        let cap = 1000.0 / 102.0;
        let expected = (cap - 0.01) * 102.0 * 0.998 - (cap * 100.0 + 0.02 * 102.0);
        match evaluate_route(&q, "BTC", Some(&fees), &cfg) {
            RouteOutcome::Opportunity(opp) => {
                assert!((opp.profit - expected).abs() < 1e-9);
                assert_eq!(opp.deposit_fee, 0.02);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let t = btc();
        let q = quote(&t, 100.0, 102.0);
        let fees = withdraw(0.01);
        let a = evaluate_route(&q, "BTC", Some(&fees), &config());
        let b = evaluate_route(&q, "BTC", Some(&fees), &config());
        assert_eq!(a, b);
    }

    #[test]
    fn pair_evaluation_walks_routes_in_order() {
        let t = Token::parse("PEPEUSDT").unwrap();
        let q = quote(&t, 100.0, 102.0);
        let mut fees = HashMap::new();
        fees.insert("ETH".to_string(), withdraw(0.01));
        let mut routes = HashMap::new();
        routes.insert("PEPE".to_string(), vec!["USDC".to_string(), "ETH".to_string()]);
        let model = FeeRouteModel::new(fees, HashMap::new(), routes);

        let outcomes = evaluate_pair(&q, &model, &config());
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], ("USDC".to_string(), RouteOutcome::NoFeeData));
        assert_eq!(outcomes[1].0, "ETH");
        assert!(outcomes[1].1.is_checked());
    }
}
