//! Monte Carlo ensemble orchestrator.
//!
//! Runs many independent single paths in parallel and reduces them into
//! an [`EnsembleResult`]. Each path gets its own ChaCha stream derived
//! from one base seed, so a seeded run is reproducible regardless of how
//! rayon schedules the work.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::path::{run_path, validate_inputs};
use super::stats;
use crate::types::{EnsembleResult, PathResult, Scenario, SimError, StrategyConfig, StrategyKind};

/// Paths beyond this index do not keep a full trajectory.
pub const DEFAULT_TRAJECTORY_PATHS: usize = 100;
/// Approximate length of the averaged trajectory handed to presentation.
pub const TRAJECTORY_DISPLAY_POINTS: usize = 50;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Ensemble sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub starting_bankroll: f64,
    /// Bets attempted per path.
    pub num_bets: u32,
    /// Number of independent paths.
    pub num_simulations: u32,
    /// Base seed; `None` draws a fresh one per run.
    pub seed: Option<u64>,
    /// How many leading paths retain their full trajectory.
    pub trajectory_paths: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_bankroll: 10_000.0,
            num_bets: 100,
            num_simulations: 1000,
            seed: None,
            trajectory_paths: DEFAULT_TRAJECTORY_PATHS,
        }
    }
}

impl SimulationConfig {
    pub fn new(starting_bankroll: f64, num_bets: u32, num_simulations: u32) -> Self {
        Self {
            starting_bankroll,
            num_bets,
            num_simulations,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_trajectory_paths(mut self, paths: usize) -> Self {
        self.trajectory_paths = paths;
        self
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs ensembles for a fixed sizing configuration.
#[derive(Debug, Clone)]
pub struct EnsembleRunner {
    config: SimulationConfig,
}

impl EnsembleRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The configured seed, or a freshly drawn one (logged so the run can
    /// be replayed).
    pub fn resolve_seed(&self) -> u64 {
        match self.config.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::thread_rng().gen();
                info!(seed, "No seed configured, drew one");
                seed
            }
        }
    }

    /// A runner pinned to `seed`, for common-random-number comparisons.
    #[must_use]
    pub fn pinned(&self, seed: u64) -> Self {
        Self::new(self.config.clone().with_seed(seed))
    }

    /// Run the ensemble and aggregate it.
    pub fn run(
        &self,
        scenarios: &[Scenario],
        strategy: &StrategyConfig,
    ) -> Result<EnsembleResult, SimError> {
        let paths = self.run_paths(scenarios, strategy, self.config.trajectory_paths)?;
        let result = aggregate(
            self.config.starting_bankroll,
            strategy.kind,
            self.config.num_bets,
            &paths,
        );

        info!(
            strategy = %strategy.kind,
            paths = result.num_simulations,
            bets = result.num_bets,
            median_final = format!("${:.2}", result.median_final),
            expected_roi = format!("{:+.2}%", result.expected_roi * 100.0),
            risk_of_ruin = format!("{:.2}%", result.risk_of_ruin * 100.0),
            "Ensemble complete"
        );
        Ok(result)
    }

    /// Run every path and return them unaggregated, in path order.
    ///
    /// Only the first `trajectory_paths` paths record trajectories.
    pub fn run_paths(
        &self,
        scenarios: &[Scenario],
        strategy: &StrategyConfig,
        trajectory_paths: usize,
    ) -> Result<Vec<PathResult>, SimError> {
        let cfg = &self.config;
        validate_inputs(cfg.starting_bankroll, scenarios, strategy)?;

        if strategy.kind == StrategyKind::Martingale {
            warn!("MARTINGALE sizing escalates geometrically after losses");
        }

        let seed = self.resolve_seed();
        debug!(
            seed,
            paths = cfg.num_simulations,
            bets = cfg.num_bets,
            scenarios = scenarios.len(),
            strategy = %strategy,
            "Dispatching paths"
        );

        let paths = (0..cfg.num_simulations)
            .into_par_iter()
            .map(|index| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(u64::from(index));
                run_path(
                    cfg.starting_bankroll,
                    scenarios,
                    strategy,
                    cfg.num_bets,
                    (index as usize) < trajectory_paths,
                    &mut rng,
                )
            })
            .collect::<Vec<_>>();

        if paths.iter().all(|p| p.total_bets == 0) {
            warn!(strategy = %strategy.kind, "No path placed a single bet");
        }
        Ok(paths)
    }
}

/// One-shot ensemble with an unseeded generator.
pub fn run_ensemble(
    starting_bankroll: f64,
    scenarios: &[Scenario],
    strategy: &StrategyConfig,
    num_bets: u32,
    num_simulations: u32,
) -> Result<EnsembleResult, SimError> {
    EnsembleRunner::new(SimulationConfig::new(starting_bankroll, num_bets, num_simulations))
        .run(scenarios, strategy)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Reduce per-path results into ensemble statistics.
pub fn aggregate(
    starting_bankroll: f64,
    strategy: StrategyKind,
    num_bets: u32,
    paths: &[PathResult],
) -> EnsembleResult {
    let n = paths.len();
    let fraction = |count: usize| if n == 0 { 0.0 } else { count as f64 / n as f64 };

    let finals: Vec<f64> = paths.iter().map(|p| p.final_bankroll).collect();
    let sorted_finals = stats::sorted(&finals);
    let drawdowns = stats::sorted(&paths.iter().map(|p| p.max_drawdown_pct).collect::<Vec<_>>());
    let win_rates: Vec<f64> = paths.iter().map(PathResult::win_rate).collect();

    let busts = paths.iter().filter(|p| p.went_bust).count();
    let profitable = paths
        .iter()
        .filter(|p| p.final_bankroll > starting_bankroll)
        .count();

    let mean_final = stats::mean(&finals);
    let risk_of_ruin = fraction(busts);

    let trajectories: Vec<Vec<f64>> = paths
        .iter()
        .filter_map(|p| p.trajectory.clone())
        .collect();
    let avg_trajectory = (!trajectories.is_empty()).then(|| {
        stats::thin(&stats::pointwise_mean(&trajectories), TRAJECTORY_DISPLAY_POINTS)
    });

    EnsembleResult {
        strategy,
        starting_bankroll,
        num_bets,
        num_simulations: n as u32,
        mean_final,
        median_final: stats::percentile(&sorted_finals, 50.0),
        std_final: stats::std_dev(&finals),
        min_final: sorted_finals.first().copied().unwrap_or(0.0),
        max_final: sorted_finals.last().copied().unwrap_or(0.0),
        final_percentiles: stats::percentiles(&sorted_finals),
        risk_of_ruin,
        survival_rate: 1.0 - risk_of_ruin,
        avg_max_drawdown_pct: stats::mean(&drawdowns),
        p95_max_drawdown_pct: stats::percentile(&drawdowns, 95.0),
        expected_roi: if n == 0 {
            0.0
        } else {
            (mean_final - starting_bankroll) / starting_bankroll
        },
        profitable_rate: fraction(profitable),
        avg_win_rate: stats::mean(&win_rates),
        avg_trajectory,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
