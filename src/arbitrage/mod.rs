pub mod cycle;
pub mod evaluator;
pub mod routes;
pub mod stats;
pub mod types;

pub use cycle::{CycleReport, SkipCounts, run_cycle};
pub use evaluator::{PairQuote, evaluate_pair, evaluate_route};
pub use routes::{FeeRouteModel, TransferFees};
pub use stats::Stats;
pub use types::{ArbitrageConfig, ArbitrageOpportunity, RouteOutcome};
