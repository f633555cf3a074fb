//! BANKROLL-SIM: Monte Carlo bankroll risk engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the scenario pool, runs the ensemble, strategy comparison,
//! variance analysis and analytic ruin screen, then prints a JSON report.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use bankroll_sim::config::AppConfig;
use bankroll_sim::simulation::{
    analyze_variance, compare_strategies, EnsembleRunner, StrategyComparison, VarianceReport,
};
use bankroll_sim::strategy::{estimate_risk_of_ruin_with, kelly_fraction, RiskOfRuinEstimate};
use bankroll_sim::types::{EnsembleResult, Scenario, StrategyConfig};

const BANNER: &str = r#"
 ___   _   _  _ _  _____ ___  _    _       ___ ___ __  __
| _ ) /_\ | \| | |/ / _ \ _ \| |  | |     / __|_ _|  \/  |
| _ \/ _ \| .` | ' < (_) |   /| |__| |__   \__ \| || |\/| |
|___/_/ \_\_|\_|_|\_\___/|_|_\|____|____| |___/___|_|  |_|

  Monte Carlo bankroll risk engine
  v0.1.0
"#;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Everything one run produces.
#[derive(Debug, Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    seed: u64,
    strategy: StrategyConfig,
    scenarios: Vec<Scenario>,
    ensemble: EnsembleResult,
    comparison: StrategyComparison,
    variance: VarianceReport,
    analytic: Vec<RiskOfRuinEstimate>,
}

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    eprintln!("{BANNER}");
    info!(
        config = %config_path,
        starting_bankroll = cfg.simulation.starting_bankroll,
        num_bets = cfg.simulation.num_bets,
        num_simulations = cfg.simulation.num_simulations,
        strategy = %cfg.strategy,
        "BANKROLL-SIM starting up"
    );

    // -- Scenario pool ---------------------------------------------------

    let scenarios = cfg.scenario_pool()?;
    for scenario in &scenarios {
        debug!(scenario = %scenario, "Pool entry");
    }

    // -- Simulation ------------------------------------------------------

    // Resolved once; every section below replays the same seed.
    let seed = EnsembleRunner::new(cfg.simulation.clone()).resolve_seed();
    let runner = EnsembleRunner::new(cfg.simulation.clone().with_seed(seed));

    let ensemble = runner
        .run(&scenarios, &cfg.strategy)
        .context("Ensemble simulation failed")?;
    eprintln!("{ensemble}");

    let comparison = compare_strategies(&runner, &scenarios, &cfg.strategy)
        .context("Strategy comparison failed")?;

    let variance = analyze_variance(&runner, &scenarios, &cfg.strategy)
        .context("Variance analysis failed")?;

    // -- Analytic screen -------------------------------------------------

    let analytic = analytic_screen(&cfg, &scenarios);

    let report = Report {
        generated_at: Utc::now(),
        seed,
        strategy: cfg.strategy,
        scenarios,
        ensemble,
        comparison,
        variance,
        analytic,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");

    info!(
        growth = %report.comparison.best_for_growth,
        safety = %report.comparison.best_for_safety,
        balanced = %report.comparison.best_balanced,
        "BANKROLL-SIM finished"
    );
    Ok(())
}

/// Fraction of bankroll the configured strategy would stake on `scenario`
/// before any loss streak.
fn planned_fraction(strategy: &StrategyConfig, scenario: &Scenario) -> f64 {
    let raw = match strategy.kind.kelly_multiplier() {
        Some(multiplier) => kelly_fraction(scenario.probability, scenario.odds) * multiplier,
        None => strategy.unit_size,
    };
    raw.min(strategy.max_bet_pct)
}

/// Closed-form ruin estimate for every scenario the strategy would bet.
fn analytic_screen(cfg: &AppConfig, scenarios: &[Scenario]) -> Vec<RiskOfRuinEstimate> {
    scenarios
        .iter()
        .filter_map(|scenario| {
            let fraction = planned_fraction(&cfg.strategy, scenario);
            match estimate_risk_of_ruin_with(
                scenario.probability,
                scenario.odds,
                fraction,
                &cfg.risk_bands,
            ) {
                Ok(estimate) => Some(estimate),
                Err(e) => {
                    debug!(scenario = %scenario, fraction, error = %e, "Skipping analytic estimate");
                    None
                }
            }
        })
        .inspect(|estimate| {
            if estimate.overbetting {
                warn!(
                    odds = %estimate.odds,
                    fraction = format!("{:.2}%", estimate.bet_fraction * 100.0),
                    kelly = format!("{:.2}%", estimate.kelly_fraction * 100.0),
                    "Stake exceeds full Kelly"
                );
            }
        })
        .collect()
}

/// Initialise the tracing subscriber with env-filter support.
///
/// Log level is controlled by `RUST_LOG` env var (default: `bankroll_sim=info`).
/// Set `BANKROLL_SIM_LOG_JSON=1` for machine-readable JSON log output.
/// Logs go to stderr so stdout carries only the report.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bankroll_sim=info"));

    let json_logging = std::env::var("BANKROLL_SIM_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
