//! Ensemble-level behaviour: degenerate pools, percentile ordering and
//! the reference HALF_KELLY scenario.

use bankroll_sim::odds::AmericanOdds;
use bankroll_sim::simulation::{EnsembleRunner, SimulationConfig};
use bankroll_sim::types::{Scenario, StrategyConfig, StrategyKind};

fn scenario(p: f64, o: i32) -> Scenario {
    Scenario::new(p, AmericanOdds::new(o).unwrap()).unwrap()
}

fn runner(bets: u32, paths: u32, seed: u64) -> EnsembleRunner {
    EnsembleRunner::new(SimulationConfig::new(10_000.0, bets, paths).with_seed(seed))
}

#[test]
fn test_certain_win_never_ruins() {
    let pool = [scenario(1.0, 100)];
    let cfg = StrategyConfig::new(StrategyKind::Flat);
    let runner = runner(100, 200, 1);

    let result = runner.run(&pool, &cfg).unwrap();
    assert_eq!(result.risk_of_ruin, 0.0);
    assert_eq!(result.survival_rate, 1.0);
    assert_eq!(result.avg_win_rate, 1.0);
    assert_eq!(result.profitable_rate, 1.0);

    let paths = runner.run_paths(&pool, &cfg, 0).unwrap();
    assert!(paths.iter().all(|p| p.wins == p.total_bets && p.total_bets == 100));
}

#[test]
fn test_hopeless_pool_always_ruins() {
    let pool = [scenario(f64::MIN_POSITIVE, -110)];
    for kind in [StrategyKind::Flat, StrategyKind::Percentage, StrategyKind::Martingale] {
        let cfg = StrategyConfig {
            bust_threshold: 0.01,
            ..StrategyConfig::new(kind)
        };
        // 2% of a shrinking roll crosses 1% of start after ~228 losses
        let result = runner(300, 100, 2).run(&pool, &cfg).unwrap();
        assert_eq!(result.risk_of_ruin, 1.0, "{kind}");
        assert_eq!(result.avg_win_rate, 0.0, "{kind}");
        assert!(result.max_final <= 100.0, "{kind}");
    }
}

#[test]
fn test_zero_sizing_strategy_cannot_ruin() {
    // Kelly stakes nothing without an edge, however bad the pool
    let pool = [scenario(f64::MIN_POSITIVE, -110)];
    let cfg = StrategyConfig {
        bust_threshold: 0.01,
        ..StrategyConfig::new(StrategyKind::Kelly)
    };
    let result = runner(300, 50, 3).run(&pool, &cfg).unwrap();
    assert_eq!(result.risk_of_ruin, 0.0);
    assert_eq!(result.mean_final, 10_000.0);
}

#[test]
fn test_percentiles_ordered() {
    let pool = [scenario(0.55, -110), scenario(0.30, 250), scenario(0.62, -150)];
    for kind in StrategyKind::ALL {
        for seed in [4, 5, 6] {
            let result = runner(150, 300, seed)
                .run(&pool, &StrategyConfig::new(*kind))
                .unwrap();
            let p = result.final_percentiles;
            assert!(result.min_final <= p.p5, "{kind}");
            assert!(p.p5 <= p.p25 && p.p25 <= p.p50, "{kind}");
            assert!(p.p50 <= p.p75 && p.p75 <= p.p95, "{kind}");
            assert!(p.p95 <= result.max_final, "{kind}");
            assert_eq!(p.p50, result.median_final);
        }
    }
}

#[test]
fn test_reference_half_kelly_scenario() {
    let pool = [scenario(0.55, -110)];
    let cfg = StrategyConfig::new(StrategyKind::HalfKelly);
    let result = runner(100, 1000, 2024).run(&pool, &cfg).unwrap();

    assert_eq!(result.num_simulations, 1000);
    assert_eq!(result.num_bets, 100);
    assert!(result.expected_roi > 0.0, "roi {}", result.expected_roi);
    assert!(result.risk_of_ruin < 0.05, "ruin {}", result.risk_of_ruin);
    assert!(result.mean_final > 10_000.0);
    assert!(result.avg_win_rate > 0.5 && result.avg_win_rate < 0.6);
}

#[test]
fn test_martingale_ruins_more_than_half_kelly() {
    let pool = [scenario(0.55, -110)];
    let base = StrategyConfig::default();

    let short = runner(100, 1000, 77);
    let half = short.run(&pool, &base.with_kind(StrategyKind::HalfKelly)).unwrap();
    let martingale = short.run(&pool, &base.with_kind(StrategyKind::Martingale)).unwrap();
    assert!(
        martingale.risk_of_ruin > half.risk_of_ruin,
        "martingale {} vs half-kelly {}",
        martingale.risk_of_ruin,
        half.risk_of_ruin
    );
    assert!(martingale.p95_max_drawdown_pct > half.p95_max_drawdown_pct);

    // Losing streaks pinned at the 25% cap compound quickly over a season
    let long = runner(500, 1000, 78);
    let half = long.run(&pool, &base.with_kind(StrategyKind::HalfKelly)).unwrap();
    let martingale = long.run(&pool, &base.with_kind(StrategyKind::Martingale)).unwrap();
    assert!(
        martingale.risk_of_ruin > half.risk_of_ruin + 0.10,
        "martingale {} vs half-kelly {}",
        martingale.risk_of_ruin,
        half.risk_of_ruin
    );
}

#[test]
fn test_trajectory_summary_shape() {
    let pool = [scenario(0.55, -110)];
    let result = runner(200, 150, 8)
        .run(&pool, &StrategyConfig::new(StrategyKind::QuarterKelly))
        .unwrap();
    let trajectory = result.avg_trajectory.unwrap();
    assert!(trajectory.len() >= 45 && trajectory.len() <= 60);
    assert_eq!(trajectory[0], 10_000.0);
}
