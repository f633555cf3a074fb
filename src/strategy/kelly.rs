//! Kelly criterion and stake sizing.
//!
//! Every sizing discipline is dispatched through [`stake_size`], so each
//! formula lives in exactly one place.

use crate::odds::AmericanOdds;
use crate::types::{Scenario, StrategyConfig, StrategyKind};

/// Numerator values this close to zero are treated as "no edge" so that
/// a probability equal to the implied probability sizes to exactly 0.
const KELLY_EPSILON: f64 = 1e-12;

/// Martingale doubling is capped at 2^64; the bankroll cap binds long before.
const MAX_DOUBLINGS: u32 = 64;

// ---------------------------------------------------------------------------
// Kelly formulas
// ---------------------------------------------------------------------------

/// Full Kelly fraction: f* = max(0, (b·p − q) / b)
/// where:
///   b = net odds (decimal − 1)
///   p = win probability
///   q = 1 − p
pub fn kelly_fraction(probability: f64, odds: AmericanOdds) -> f64 {
    let b = odds.net_odds();
    if b <= 0.0 {
        return 0.0;
    }
    let q = 1.0 - probability;
    let numerator = b * probability - q;
    if numerator <= KELLY_EPSILON {
        return 0.0;
    }
    numerator / b
}

/// Expected log growth per bet when staking a fixed fraction `f`:
/// g = p·ln(1 + f·b) + q·ln(1 − f)
pub fn growth_rate(probability: f64, odds: AmericanOdds, fraction: f64) -> f64 {
    let b = odds.net_odds();
    let q = 1.0 - probability;
    let win_term = probability * (1.0 + fraction * b).ln();
    // q == 0 with f == 1 would be 0·(−∞); a certain win never loses the stake.
    let lose_term = if q > 0.0 { q * (1.0 - fraction).ln() } else { 0.0 };
    win_term + lose_term
}

// ---------------------------------------------------------------------------
// Stake sizing
// ---------------------------------------------------------------------------

/// Stake for the next bet, guaranteed to satisfy
/// `0 ≤ stake ≤ min(bankroll, max_bet_pct · bankroll)`.
///
/// `consecutive_losses` only matters for MARTINGALE. A dead (≤ 0) bankroll
/// always sizes to zero.
pub fn stake_size(
    bankroll: f64,
    config: &StrategyConfig,
    scenario: &Scenario,
    consecutive_losses: u32,
) -> f64 {
    if bankroll <= 0.0 || !bankroll.is_finite() {
        return 0.0;
    }

    let raw = match config.kind {
        StrategyKind::Flat | StrategyKind::Percentage => bankroll * config.unit_size,
        StrategyKind::Kelly | StrategyKind::HalfKelly | StrategyKind::QuarterKelly => {
            let multiplier = config.kind.kelly_multiplier().unwrap_or(1.0);
            bankroll * kelly_fraction(scenario.probability, scenario.odds) * multiplier
        }
        StrategyKind::Martingale => {
            let doublings = consecutive_losses.min(MAX_DOUBLINGS) as i32;
            bankroll * config.unit_size * 2f64.powi(doublings)
        }
    };

    let cap = bankroll * config.max_bet_pct;
    let stake = raw.min(cap).min(bankroll).max(0.0);
    if stake.is_nan() {
        0.0
    } else {
        stake
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
