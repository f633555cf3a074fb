//! Shared types for the bankroll simulator.
//!
//! These records form the data model used across all modules: the
//! inputs a caller builds per request (scenarios, strategy configuration)
//! and the pure computed outputs (path and ensemble results). Nothing
//! here carries persistent identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::odds::AmericanOdds;

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A bet opportunity: true win probability against quoted odds.
///
/// A pool of scenarios is sampled uniformly once per simulated bet,
/// modelling the heterogeneity of available opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Model win probability, in (0, 1].
    pub probability: f64,
    pub odds: AmericanOdds,
    /// Probability minus the odds' implied probability.
    pub edge: f64,
}

impl Scenario {
    /// Build a scenario, deriving `edge` from the odds.
    pub fn new(probability: f64, odds: AmericanOdds) -> Result<Self, SimError> {
        validate_probability(probability)?;
        Ok(Self {
            probability,
            odds,
            edge: probability - odds.implied_probability(),
        })
    }

    /// Build a scenario with a caller-supplied (precomputed) edge.
    pub fn with_edge(probability: f64, odds: AmericanOdds, edge: f64) -> Result<Self, SimError> {
        validate_probability(probability)?;
        Ok(Self { probability, odds, edge })
    }

    /// Re-check the probability bound on a scenario that may have been
    /// deserialized rather than constructed.
    pub fn validate(&self) -> Result<(), SimError> {
        validate_probability(self.probability)
    }

    /// Net payout per unit staked on a win (decimal odds − 1).
    pub fn net_odds(&self) -> f64 {
        self.odds.net_odds()
    }

    /// Expected profit per unit staked: p·b − q.
    pub fn expected_value_per_unit(&self) -> f64 {
        self.probability * self.net_odds() - (1.0 - self.probability)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p={:.1}% @ {} (edge {:+.2}%)",
            self.probability * 100.0,
            self.odds,
            self.edge * 100.0,
        )
    }
}

fn validate_probability(probability: f64) -> Result<(), SimError> {
    if probability.is_finite() && probability > 0.0 && probability <= 1.0 {
        Ok(())
    } else {
        Err(SimError::InvalidProbability(probability))
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Stake-sizing discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    Flat,
    Kelly,
    HalfKelly,
    QuarterKelly,
    Percentage,
    /// Doubles the stake after every loss. Kept to demonstrate its risk.
    Martingale,
}

impl StrategyKind {
    /// Every known strategy.
    pub const ALL: &'static [StrategyKind] = &[
        StrategyKind::Flat,
        StrategyKind::Kelly,
        StrategyKind::HalfKelly,
        StrategyKind::QuarterKelly,
        StrategyKind::Percentage,
        StrategyKind::Martingale,
    ];

    /// Candidates ranked by the strategy comparator, in run order.
    pub const COMPARISON_SET: &'static [StrategyKind] = &[
        StrategyKind::Flat,
        StrategyKind::QuarterKelly,
        StrategyKind::HalfKelly,
        StrategyKind::Kelly,
        StrategyKind::Percentage,
    ];

    /// Multiplier applied to the full Kelly fraction, if Kelly-based.
    pub fn kelly_multiplier(&self) -> Option<f64> {
        match self {
            StrategyKind::Kelly => Some(1.0),
            StrategyKind::HalfKelly => Some(0.5),
            StrategyKind::QuarterKelly => Some(0.25),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Flat => write!(f, "FLAT"),
            StrategyKind::Kelly => write!(f, "KELLY"),
            StrategyKind::HalfKelly => write!(f, "HALF_KELLY"),
            StrategyKind::QuarterKelly => write!(f, "QUARTER_KELLY"),
            StrategyKind::Percentage => write!(f, "PERCENTAGE"),
            StrategyKind::Martingale => write!(f, "MARTINGALE"),
        }
    }
}

/// Parse a strategy tag (case-insensitive, `-` or `_` separated).
impl std::str::FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "FLAT" => Ok(StrategyKind::Flat),
            "KELLY" | "FULL_KELLY" => Ok(StrategyKind::Kelly),
            "HALF_KELLY" => Ok(StrategyKind::HalfKelly),
            "QUARTER_KELLY" => Ok(StrategyKind::QuarterKelly),
            "PERCENTAGE" => Ok(StrategyKind::Percentage),
            "MARTINGALE" => Ok(StrategyKind::Martingale),
            other => Err(SimError::InvalidStrategy(format!("unknown strategy: {other}"))),
        }
    }
}

/// A sizing discipline plus its numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    /// Stake as a fraction of bankroll for FLAT / PERCENTAGE / MARTINGALE.
    pub unit_size: f64,
    /// Hard cap on any single stake, as a fraction of bankroll.
    pub max_bet_pct: f64,
    /// Fraction of the starting bankroll at or below which a path is
    /// ruined (0.1 = lost 90%).
    pub bust_threshold: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::HalfKelly,
            unit_size: 0.02,   // 2% of bankroll per unit
            max_bet_pct: 0.25, // never more than a quarter of the roll
            bust_threshold: 0.10, // ruined at 10% of the starting roll
        }
    }
}

impl StrategyConfig {
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Same parameters, different discipline.
    pub fn with_kind(&self, kind: StrategyKind) -> Self {
        Self { kind, ..*self }
    }

    /// Shape and non-negativity checks; `bust_threshold` must also lie in
    /// [0, 1]. Other upper bounds are the caller's call.
    pub fn validate(&self) -> Result<(), SimError> {
        let fields = [
            ("unit_size", self.unit_size),
            ("max_bet_pct", self.max_bet_pct),
            ("bust_threshold", self.bust_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidStrategy(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.bust_threshold > 1.0 {
            return Err(SimError::InvalidStrategy(format!(
                "bust_threshold is a fraction of the starting bankroll, got {}",
                self.bust_threshold
            )));
        }
        Ok(())
    }

    /// Absolute bankroll level that counts as ruin for `starting_bankroll`.
    pub fn bust_level(&self, starting_bankroll: f64) -> f64 {
        starting_bankroll * self.bust_threshold
    }
}

impl fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (unit {:.1}% | cap {:.1}% | bust ≤ {:.1}% of start)",
            self.kind,
            self.unit_size * 100.0,
            self.max_bet_pct * 100.0,
            self.bust_threshold * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of one simulated betting path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub final_bankroll: f64,
    pub max_bankroll: f64,
    pub min_bankroll: f64,
    /// Largest peak-to-trough decline, in percent of the running peak.
    pub max_drawdown_pct: f64,
    /// Stakes actually placed (zero-size steps are not bets).
    pub total_bets: u32,
    pub wins: u32,
    pub losses: u32,
    pub went_bust: bool,
    /// Bankroll after each step, starting bankroll first. Padded with the
    /// bust value to `num_bets + 1` entries when the path ends early.
    pub trajectory: Option<Vec<f64>>,
}

impl PathResult {
    /// Fraction of placed bets that won (0.0 when nothing was staked).
    pub fn win_rate(&self) -> f64 {
        if self.total_bets == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_bets as f64
        }
    }

    /// Return on the starting bankroll, as a fraction.
    pub fn roi(&self, starting_bankroll: f64) -> f64 {
        (self.final_bankroll - starting_bankroll) / starting_bankroll
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "final ${:.2} | {}W/{}L | max DD {:.1}%{}",
            self.final_bankroll,
            self.wins,
            self.losses,
            self.max_drawdown_pct,
            if self.went_bust { " | BUST" } else { "" },
        )
    }
}

/// The five standard percentiles of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Aggregated statistics over many independent paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub strategy: StrategyKind,
    pub starting_bankroll: f64,
    pub num_bets: u32,
    pub num_simulations: u32,
    pub mean_final: f64,
    pub median_final: f64,
    pub std_final: f64,
    pub min_final: f64,
    pub max_final: f64,
    pub final_percentiles: Percentiles,
    /// Fraction of paths that hit the bust threshold.
    pub risk_of_ruin: f64,
    pub survival_rate: f64,
    pub avg_max_drawdown_pct: f64,
    pub p95_max_drawdown_pct: f64,
    /// (mean final − starting) / starting.
    pub expected_roi: f64,
    /// Fraction of paths ending above the starting bankroll.
    pub profitable_rate: f64,
    pub avg_win_rate: f64,
    /// Pointwise mean of the retained trajectories, thinned for display.
    pub avg_trajectory: Option<Vec<f64>>,
}

impl fmt::Display for EnsembleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} paths/{} bets | median ${:.2} | ROI {:+.2}% | ruin {:.2}% | avg DD {:.1}%",
            self.strategy,
            self.num_simulations,
            self.num_bets,
            self.median_final,
            self.expected_roi * 100.0,
            self.risk_of_ruin * 100.0,
            self.avg_max_drawdown_pct,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Invalid-input errors, raised before any simulation work begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("Invalid American odds: {0} (must be non-zero)")]
    InvalidOdds(i32),

    #[error("Invalid decimal odds: {0} (must be greater than 1.0)")]
    InvalidDecimalOdds(f64),

    #[error("Invalid probability: {0} (must lie in (0, 1])")]
    InvalidProbability(f64),

    #[error("Scenario pool is empty")]
    EmptyScenarioPool,

    #[error("Invalid starting bankroll: ${0:.2} (must be positive)")]
    InvalidBankroll(f64),

    #[error("Invalid strategy configuration: {0}")]
    InvalidStrategy(String),

    #[error("Invalid bet fraction: {0} (must lie in (0, 1))")]
    InvalidBetFraction(f64),

    #[error("Invalid edge profile: {0}")]
    InvalidEdgeProfile(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
