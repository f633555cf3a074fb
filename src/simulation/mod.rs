//! Monte Carlo simulation: single paths, ensembles, strategy ranking
//! and return-distribution analysis.

pub mod comparison;
pub mod ensemble;
pub mod path;
pub mod stats;
pub mod variance;

pub use comparison::{compare_strategies, StrategyComparison, StrategySummary};
pub use ensemble::{aggregate, run_ensemble, EnsembleRunner, SimulationConfig};
pub use path::simulate_path;
pub use variance::{analyze_returns, analyze_variance, RatioValue, VarianceReport};
