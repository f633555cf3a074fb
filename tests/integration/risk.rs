//! Analytic ruin screen, odds conversion and the strategy comparator.

use bankroll_sim::odds::{american_to_decimal, decimal_to_american, AmericanOdds};
use bankroll_sim::simulation::{analyze_variance, compare_strategies, EnsembleRunner, SimulationConfig};
use bankroll_sim::strategy::{estimate_risk_of_ruin, kelly_fraction, Recommendation};
use bankroll_sim::types::{Scenario, StrategyConfig, StrategyKind};

fn odds(v: i32) -> AmericanOdds {
    AmericanOdds::new(v).unwrap()
}

#[test]
fn test_odds_round_trip_on_common_prices() {
    for quote in [-1000, -250, -110, -105, 100, 105, 120, 150, 400, 1500] {
        let decimal = american_to_decimal(quote).unwrap();
        let back = decimal_to_american(decimal).unwrap();
        assert!((back - quote).abs() <= 1, "{quote} -> {decimal} -> {back}");
    }
}

#[test]
fn test_kelly_zero_at_fair_price() {
    for quote in [-300, -110, 100, 175, 600] {
        let o = odds(quote);
        assert_eq!(kelly_fraction(o.implied_probability(), o), 0.0, "{quote}");
    }
}

#[test]
fn test_analytic_ruin_rises_with_fraction() {
    let fractions = [0.01, 0.02, 0.05, 0.10, 0.20, 0.40, 0.80];
    let ruins: Vec<f64> = fractions
        .iter()
        .map(|f| estimate_risk_of_ruin(0.55, odds(-110), *f).unwrap().risk_of_ruin)
        .collect();
    for pair in ruins.windows(2) {
        assert!(pair[0] <= pair[1], "{ruins:?}");
    }
}

#[test]
fn test_analytic_and_sampled_agree_on_ordering() {
    let pool = [Scenario::new(0.55, odds(-110)).unwrap()];
    let runner = EnsembleRunner::new(SimulationConfig::new(10_000.0, 200, 500).with_seed(31));
    let sampled = |fraction: f64| {
        let cfg = StrategyConfig {
            kind: StrategyKind::Percentage,
            unit_size: fraction,
            max_bet_pct: 1.0,
            bust_threshold: 0.5,
        };
        runner.run(&pool, &cfg).unwrap().risk_of_ruin
    };

    let (small, large) = (0.02, 0.30);
    let analytic_small = estimate_risk_of_ruin(0.55, odds(-110), small).unwrap();
    let analytic_large = estimate_risk_of_ruin(0.55, odds(-110), large).unwrap();

    assert!(analytic_small.risk_of_ruin < analytic_large.risk_of_ruin);
    assert!(sampled(small) < sampled(large));
    assert_eq!(analytic_large.recommendation, Recommendation::ReduceStake);
}

#[test]
fn test_no_edge_saturates() {
    let est = estimate_risk_of_ruin(0.50, odds(-110), 0.05).unwrap();
    assert_eq!(est.risk_of_ruin, 1.0);
    assert_eq!(est.recommendation, Recommendation::NoEdge);
    assert!(est.bets_to_double.is_none());
}

#[test]
fn test_comparison_covers_fixed_set() {
    let pools = [
        vec![Scenario::new(0.55, odds(-110)).unwrap()],
        vec![Scenario::new(0.45, odds(-110)).unwrap()],
        vec![
            Scenario::new(0.40, odds(200)).unwrap(),
            Scenario::new(0.70, odds(-200)).unwrap(),
        ],
    ];
    let runner = EnsembleRunner::new(SimulationConfig::new(1_000.0, 50, 100).with_seed(12));
    for pool in &pools {
        let cmp = compare_strategies(&runner, pool, &StrategyConfig::default()).unwrap();
        assert_eq!(cmp.rankings.len(), StrategyKind::COMPARISON_SET.len());
        for kind in StrategyKind::COMPARISON_SET {
            assert_eq!(cmp.rankings.iter().filter(|r| r.strategy == *kind).count(), 1);
        }
    }
}

#[test]
fn test_variance_report_counts_every_path() {
    let pool = [Scenario::new(0.55, odds(-110)).unwrap()];
    let runner = EnsembleRunner::new(SimulationConfig::new(10_000.0, 100, 400).with_seed(3));
    let report = analyze_variance(&runner, &pool, &StrategyConfig::new(StrategyKind::Kelly)).unwrap();
    assert_eq!(report.num_paths, 400);
    assert_eq!(report.positive_paths + report.negative_paths + report.zero_paths, 400);
    assert!(report.mean_return_pct > 0.0);
    assert!(report.sharpe_ratio > 0.0);
    assert!(report.sortino_ratio.value().is_some());
}
