//! Variance and distribution analysis of per-path returns.
//!
//! Dispersion, downside risk, risk-adjusted ratios and shape of the
//! return distribution for one strategy. Trajectories are not retained.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use super::ensemble::EnsembleRunner;
use super::stats;
use crate::types::{Scenario, SimError, StrategyConfig, StrategyKind};

/// Returns within this distance of zero count as flat.
const ZERO_RETURN_TOLERANCE: f64 = 1e-9;

/// A ratio that may have no finite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatioValue {
    Finite(f64),
    /// No losing path, so there is no downside to divide by.
    Undefined,
}

impl RatioValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            RatioValue::Finite(v) => Some(*v),
            RatioValue::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, RatioValue::Undefined)
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioValue::Finite(v) => write!(f, "{v:.3}"),
            RatioValue::Undefined => write!(f, "∞"),
        }
    }
}

/// Distribution statistics over per-path percentage returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceReport {
    pub strategy: StrategyKind,
    pub num_paths: usize,
    /// Mean return, percent of starting bankroll.
    pub mean_return_pct: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// Root-mean-square of the negative returns; positive whenever any
    /// path lost money.
    pub downside_deviation: f64,
    /// mean / std-dev, zero risk-free rate.
    pub sharpe_ratio: f64,
    /// mean / downside deviation.
    pub sortino_ratio: RatioValue,
    pub skewness: f64,
    pub min_return_pct: f64,
    pub max_return_pct: f64,
    pub positive_paths: usize,
    pub negative_paths: usize,
    pub zero_paths: usize,
}

/// Run an ensemble for `strategy` and analyse its return distribution.
pub fn analyze_variance(
    runner: &EnsembleRunner,
    scenarios: &[Scenario],
    strategy: &StrategyConfig,
) -> Result<VarianceReport, SimError> {
    let start = runner.config().starting_bankroll;
    let paths = runner.run_paths(scenarios, strategy, 0)?;
    let returns: Vec<f64> = paths.iter().map(|p| p.roi(start) * 100.0).collect();

    let report = analyze_returns(strategy.kind, &returns);
    info!(
        strategy = %strategy.kind,
        mean = format!("{:+.2}%", report.mean_return_pct),
        std_dev = format!("{:.2}", report.std_dev),
        sharpe = format!("{:.3}", report.sharpe_ratio),
        sortino = %report.sortino_ratio,
        skew = format!("{:.3}", report.skewness),
        "Variance analysis complete"
    );
    Ok(report)
}

/// Pure statistics over a set of percentage returns.
pub fn analyze_returns(strategy: StrategyKind, returns: &[f64]) -> VarianceReport {
    let mean = stats::mean(returns);
    let variance = stats::variance(returns);
    let std_dev = variance.sqrt();

    let negatives: Vec<f64> = returns
        .iter()
        .copied()
        .filter(|r| *r < -ZERO_RETURN_TOLERANCE)
        .collect();
    let positive_paths = returns.iter().filter(|r| **r > ZERO_RETURN_TOLERANCE).count();
    let downside_deviation = stats::root_mean_square(&negatives);

    let sharpe_ratio = if std_dev > 0.0 { mean / std_dev } else { 0.0 };
    let sortino_ratio = if negatives.is_empty() {
        RatioValue::Undefined
    } else {
        RatioValue::Finite(mean / downside_deviation)
    };

    let sorted = stats::sorted(returns);

    VarianceReport {
        strategy,
        num_paths: returns.len(),
        mean_return_pct: mean,
        variance,
        std_dev,
        downside_deviation,
        sharpe_ratio,
        sortino_ratio,
        skewness: stats::skewness(returns),
        min_return_pct: sorted.first().copied().unwrap_or(0.0),
        max_return_pct: sorted.last().copied().unwrap_or(0.0),
        positive_paths,
        negative_paths: negatives.len(),
        zero_paths: returns.len() - positive_paths - negatives.len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
