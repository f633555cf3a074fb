//! Strategy comparator.
//!
//! Runs the ensemble once per candidate sizing discipline under identical
//! inputs and ranks the results.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

use super::ensemble::EnsembleRunner;
use crate::types::{EnsembleResult, Scenario, SimError, StrategyConfig, StrategyKind};

/// Weight on ROI in the balanced score `risk_of_ruin − weight · roi`.
pub const BALANCED_ROI_WEIGHT: f64 = 5.0;

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: StrategyKind,
    pub expected_roi: f64,
    pub risk_of_ruin: f64,
    pub survival_rate: f64,
    pub mean_final: f64,
    pub median_final: f64,
    pub p5_final: f64,
    pub p95_final: f64,
    pub avg_max_drawdown_pct: f64,
    pub profitable_rate: f64,
}

impl StrategySummary {
    /// Lower is better: ruin penalised, growth rewarded.
    pub fn balanced_score(&self) -> f64 {
        self.risk_of_ruin - BALANCED_ROI_WEIGHT * self.expected_roi
    }
}

impl From<&EnsembleResult> for StrategySummary {
    fn from(r: &EnsembleResult) -> Self {
        Self {
            strategy: r.strategy,
            expected_roi: r.expected_roi,
            risk_of_ruin: r.risk_of_ruin,
            survival_rate: r.survival_rate,
            mean_final: r.mean_final,
            median_final: r.median_final,
            p5_final: r.final_percentiles.p5,
            p95_final: r.final_percentiles.p95,
            avg_max_drawdown_pct: r.avg_max_drawdown_pct,
            profitable_rate: r.profitable_rate,
        }
    }
}

/// Ranked comparison across [`StrategyKind::COMPARISON_SET`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// Sorted by expected ROI, best first.
    pub rankings: Vec<StrategySummary>,
    pub best_for_growth: StrategyKind,
    pub best_for_safety: StrategyKind,
    pub best_balanced: StrategyKind,
}

/// Run every candidate with the same bankroll, pool, bet count, path
/// count and base seed, then rank.
///
/// `base` supplies unit size, cap and bust threshold; its `kind` is
/// replaced per candidate.
pub fn compare_strategies(
    runner: &EnsembleRunner,
    scenarios: &[Scenario],
    base: &StrategyConfig,
) -> Result<StrategyComparison, SimError> {
    // Same seed for every candidate: differences come from sizing, not luck.
    let runner = runner.pinned(runner.resolve_seed());

    let mut rankings = StrategyKind::COMPARISON_SET
        .iter()
        .map(|kind| {
            runner
                .run(scenarios, &base.with_kind(*kind))
                .map(|result| StrategySummary::from(&result))
        })
        .collect::<Result<Vec<_>, _>>()?;

    rankings.sort_by(|a, b| {
        b.expected_roi
            .partial_cmp(&a.expected_roi)
            .unwrap_or(Ordering::Equal)
    });

    let best_for_growth = rankings.first().map(|s| s.strategy).unwrap_or(StrategyKind::Flat);
    let best_for_safety = minimizer(&rankings, |s| s.risk_of_ruin);
    let best_balanced = minimizer(&rankings, StrategySummary::balanced_score);

    info!(
        growth = %best_for_growth,
        safety = %best_for_safety,
        balanced = %best_balanced,
        "Strategy comparison complete"
    );

    Ok(StrategyComparison {
        rankings,
        best_for_growth,
        best_for_safety,
        best_balanced,
    })
}

/// First row (in ranking order) minimising `key`.
fn minimizer(rankings: &[StrategySummary], key: impl Fn(&StrategySummary) -> f64) -> StrategyKind {
    rankings
        .iter()
        .min_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal))
        .map(|s| s.strategy)
        .unwrap_or(StrategyKind::Flat)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::AmericanOdds;
    use crate::simulation::ensemble::SimulationConfig;

    fn scenario(p: f64, o: i32) -> Scenario {
        Scenario::new(p, AmericanOdds::new(o).unwrap()).unwrap()
    }

    fn runner(seed: u64) -> EnsembleRunner {
        EnsembleRunner::new(SimulationConfig::new(10_000.0, 100, 200).with_seed(seed))
    }

    #[test]
    fn test_each_candidate_exactly_once() {
        let pool = [scenario(0.55, -110)];
        let cmp = compare_strategies(&runner(5), &pool, &StrategyConfig::default()).unwrap();
        assert_eq!(cmp.rankings.len(), 5);
        for kind in StrategyKind::COMPARISON_SET {
            assert_eq!(cmp.rankings.iter().filter(|s| s.strategy == *kind).count(), 1);
        }
        assert!(!cmp.rankings.iter().any(|s| s.strategy == StrategyKind::Martingale));
    }

    #[test]
    fn test_sorted_by_roi_descending() {
        let pool = [scenario(0.58, -110), scenario(0.45, 150)];
        let cmp = compare_strategies(&runner(8), &pool, &StrategyConfig::default()).unwrap();
        for pair in cmp.rankings.windows(2) {
            assert!(pair[0].expected_roi >= pair[1].expected_roi);
        }
        assert_eq!(cmp.best_for_growth, cmp.rankings[0].strategy);
    }

    #[test]
    fn test_best_picks_are_consistent() {
        let pool = [scenario(0.60, 100)];
        let cmp = compare_strategies(&runner(13), &pool, &StrategyConfig::default()).unwrap();
        let min_ruin = cmp
            .rankings
            .iter()
            .map(|s| s.risk_of_ruin)
            .fold(f64::INFINITY, f64::min);
        let safest = cmp.rankings.iter().find(|s| s.strategy == cmp.best_for_safety).unwrap();
        assert_eq!(safest.risk_of_ruin, min_ruin);

        let min_score = cmp
            .rankings
            .iter()
            .map(StrategySummary::balanced_score)
            .fold(f64::INFINITY, f64::min);
        let balanced = cmp.rankings.iter().find(|s| s.strategy == cmp.best_balanced).unwrap();
        assert_eq!(balanced.balanced_score(), min_score);
    }

    #[test]
    fn test_no_edge_pool_favours_not_betting_kelly() {
        // Kelly variants stake nothing without an edge, so they neither
        // grow nor shrink; FLAT/PERCENTAGE bleed the vig.
        let pool = [scenario(0.50, -110)];
        let cmp = compare_strategies(&runner(21), &pool, &StrategyConfig::default()).unwrap();
        let kelly = cmp.rankings.iter().find(|s| s.strategy == StrategyKind::Kelly).unwrap();
        let flat = cmp.rankings.iter().find(|s| s.strategy == StrategyKind::Flat).unwrap();
        assert_eq!(kelly.expected_roi, 0.0);
        assert!(flat.expected_roi < 0.0);
    }

    #[test]
    fn test_balanced_score() {
        let s = StrategySummary {
            strategy: StrategyKind::Flat,
            expected_roi: 0.10,
            risk_of_ruin: 0.02,
            survival_rate: 0.98,
            mean_final: 0.0,
            median_final: 0.0,
            p5_final: 0.0,
            p95_final: 0.0,
            avg_max_drawdown_pct: 0.0,
            profitable_rate: 0.0,
        };
        assert!((s.balanced_score() - (0.02 - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_input_propagates() {
        let err = compare_strategies(&runner(1), &[], &StrategyConfig::default()).unwrap_err();
        assert_eq!(err, SimError::EmptyScenarioPool);
    }
}
