//! Single-path simulator.
//!
//! Walks one sequential betting path of up to `num_bets` steps:
//! ACTIVE → {ACTIVE, BUST, COMPLETE}. Each path draws only from its own
//! generator and reads the scenario pool and strategy immutably, so any
//! number of paths can run side by side without locking.

use rand::Rng;
use tracing::debug;

use crate::strategy::kelly::stake_size;
use crate::types::{PathResult, Scenario, SimError, StrategyConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathState {
    Active,
    Bust,
    Complete,
}

/// Reject inputs that would make a simulation meaningless.
pub fn validate_inputs(
    starting_bankroll: f64,
    scenarios: &[Scenario],
    strategy: &StrategyConfig,
) -> Result<(), SimError> {
    if !starting_bankroll.is_finite() || starting_bankroll <= 0.0 {
        return Err(SimError::InvalidBankroll(starting_bankroll));
    }
    if scenarios.is_empty() {
        return Err(SimError::EmptyScenarioPool);
    }
    for scenario in scenarios {
        scenario.validate()?;
    }
    strategy.validate()
}

/// Simulate one path after validating its inputs.
///
/// `track_trajectory` records the bankroll after every step (starting
/// bankroll first); a bust pads the rest with the bust value so the
/// trajectory always has `num_bets + 1` entries.
pub fn simulate_path<R: Rng + ?Sized>(
    starting_bankroll: f64,
    scenarios: &[Scenario],
    strategy: &StrategyConfig,
    num_bets: u32,
    track_trajectory: bool,
    rng: &mut R,
) -> Result<PathResult, SimError> {
    validate_inputs(starting_bankroll, scenarios, strategy)?;
    Ok(run_path(
        starting_bankroll,
        scenarios,
        strategy,
        num_bets,
        track_trajectory,
        rng,
    ))
}

/// Path loop proper. Callers must have validated the inputs.
pub(crate) fn run_path<R: Rng + ?Sized>(
    starting_bankroll: f64,
    scenarios: &[Scenario],
    strategy: &StrategyConfig,
    num_bets: u32,
    track_trajectory: bool,
    rng: &mut R,
) -> PathResult {
    let bust_level = strategy.bust_level(starting_bankroll);
    let horizon = num_bets as usize + 1;

    let mut bankroll = starting_bankroll;
    let mut peak = starting_bankroll;
    let mut max_bankroll = starting_bankroll;
    let mut min_bankroll = starting_bankroll;
    let mut max_drawdown = 0.0_f64;
    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut consecutive_losses = 0u32;
    let mut trajectory = track_trajectory.then(|| {
        let mut t = Vec::with_capacity(horizon);
        t.push(starting_bankroll);
        t
    });

    let mut state = if bankroll <= bust_level {
        PathState::Bust
    } else {
        PathState::Active
    };
    let mut step = 0u32;

    while state == PathState::Active {
        if step == num_bets {
            state = PathState::Complete;
            break;
        }
        step += 1;

        let scenario = &scenarios[rng.gen_range(0..scenarios.len())];
        let stake = stake_size(bankroll, strategy, scenario, consecutive_losses);

        // A zero stake is a no-op step: nothing wagered, nothing counted.
        if stake > 0.0 {
            if rng.gen::<f64>() < scenario.probability {
                bankroll += stake * scenario.net_odds();
                wins += 1;
                consecutive_losses = 0;
            } else {
                bankroll = (bankroll - stake).max(bust_level);
                losses += 1;
                consecutive_losses = consecutive_losses.saturating_add(1);
            }

            max_bankroll = max_bankroll.max(bankroll);
            min_bankroll = min_bankroll.min(bankroll);
            peak = peak.max(bankroll);
            if peak > 0.0 {
                max_drawdown = max_drawdown.max((peak - bankroll) / peak);
            }
        }

        if let Some(t) = trajectory.as_mut() {
            t.push(bankroll);
        }

        if bankroll <= bust_level {
            debug!(step, bankroll, "Path bust");
            state = PathState::Bust;
        }
    }

    if let Some(t) = trajectory.as_mut() {
        t.resize(horizon, bankroll);
    }

    PathResult {
        final_bankroll: bankroll,
        max_bankroll,
        min_bankroll,
        max_drawdown_pct: max_drawdown * 100.0,
        total_bets: wins + losses,
        wins,
        losses,
        went_bust: state == PathState::Bust,
        trajectory,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
