//! Analytic risk-of-ruin estimator.
//!
//! Closed-form screening estimate for a *fixed* bet fraction, independent
//! of sampling. Only its ordering is expected to agree with the Monte
//! Carlo ensemble: the simulator's Kelly variants re-size every bet.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::kelly::{growth_rate, kelly_fraction};
use crate::odds::AmericanOdds;
use crate::types::SimError;

// ---------------------------------------------------------------------------
// Recommendation bands (defaults, overridable via config.toml)
// ---------------------------------------------------------------------------

/// Ruin estimate at or above which the risk is called high.
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.20;
/// Ruin estimate at or above which the risk is called moderate.
pub const DEFAULT_MODERATE_RISK_THRESHOLD: f64 = 0.05;
/// Ruin estimate below which the risk is called minimal.
pub const DEFAULT_LOW_RISK_THRESHOLD: f64 = 0.01;

/// Threshold bands mapping a ruin estimate to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBands {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_RISK_THRESHOLD,
            moderate: DEFAULT_MODERATE_RISK_THRESHOLD,
            low: DEFAULT_LOW_RISK_THRESHOLD,
        }
    }
}

impl RiskBands {
    /// Classify a ruin estimate. Non-positive edge and overbetting take
    /// precedence over the numeric bands.
    pub fn classify(&self, edge: f64, risk_of_ruin: f64, overbetting: bool) -> Recommendation {
        if edge <= 0.0 {
            Recommendation::NoEdge
        } else if overbetting {
            Recommendation::ReduceStake
        } else if risk_of_ruin >= self.high {
            Recommendation::HighRisk
        } else if risk_of_ruin >= self.moderate {
            Recommendation::ModerateRisk
        } else if risk_of_ruin >= self.low {
            Recommendation::LowRisk
        } else {
            Recommendation::MinimalRisk
        }
    }
}

/// Qualitative verdict on a fixed-fraction staking plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// The price offers no edge; ruin is certain in the long run.
    NoEdge,
    /// Stake exceeds full Kelly: more risk for less growth.
    ReduceStake,
    HighRisk,
    ModerateRisk,
    LowRisk,
    MinimalRisk,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Recommendation::NoEdge => "No edge at this price: do not bet",
            Recommendation::ReduceStake => "Overbetting beyond full Kelly: reduce stake",
            Recommendation::HighRisk => "High risk of ruin: reduce stake substantially",
            Recommendation::ModerateRisk => "Moderate risk of ruin: consider a smaller fraction",
            Recommendation::LowRisk => "Low risk of ruin: acceptable for most bankrolls",
            Recommendation::MinimalRisk => "Minimal risk of ruin",
        };
        write!(f, "{text}")
    }
}

// ---------------------------------------------------------------------------
// Estimate
// ---------------------------------------------------------------------------

/// Result of the closed-form risk screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskOfRuinEstimate {
    pub probability: f64,
    pub odds: AmericanOdds,
    pub bet_fraction: f64,
    /// p − implied probability.
    pub edge: f64,
    pub kelly_fraction: f64,
    /// Expected log growth per bet at `bet_fraction`.
    pub growth_rate: f64,
    /// Bets needed to double the bankroll at the expected growth rate.
    pub bets_to_double: Option<f64>,
    /// Approximate ruin probability, clamped to [0, 1].
    pub risk_of_ruin: f64,
    pub overbetting: bool,
    pub recommendation: Recommendation,
}

/// Screen a fixed-fraction plan with the default bands.
pub fn estimate_risk_of_ruin(
    probability: f64,
    odds: AmericanOdds,
    bet_fraction: f64,
) -> Result<RiskOfRuinEstimate, SimError> {
    estimate_risk_of_ruin_with(probability, odds, bet_fraction, &RiskBands::default())
}

/// Screen a fixed-fraction plan:
///   edge = p − implied(odds)
///   g    = p·ln(1 + f·b) + q·ln(1 − f)
///   ruin ≈ ((1 − edge) / (1 + edge))^(1/f), saturating at 1.0 for edge ≤ 0
pub fn estimate_risk_of_ruin_with(
    probability: f64,
    odds: AmericanOdds,
    bet_fraction: f64,
    bands: &RiskBands,
) -> Result<RiskOfRuinEstimate, SimError> {
    if !(probability.is_finite() && probability > 0.0 && probability <= 1.0) {
        return Err(SimError::InvalidProbability(probability));
    }
    if !(bet_fraction.is_finite() && bet_fraction > 0.0 && bet_fraction < 1.0) {
        return Err(SimError::InvalidBetFraction(bet_fraction));
    }

    let edge = probability - odds.implied_probability();
    let kelly = kelly_fraction(probability, odds);
    let growth = growth_rate(probability, odds, bet_fraction);

    let risk_of_ruin = if edge <= 0.0 {
        1.0
    } else {
        ((1.0 - edge) / (1.0 + edge)).powf(1.0 / bet_fraction).clamp(0.0, 1.0)
    };
    let overbetting = bet_fraction > kelly;
    let bets_to_double = (growth > 0.0).then(|| std::f64::consts::LN_2 / growth);
    let recommendation = bands.classify(edge, risk_of_ruin, overbetting);

    debug!(
        probability,
        odds = %odds,
        bet_fraction,
        edge = format!("{:.2}%", edge * 100.0),
        kelly = format!("{:.2}%", kelly * 100.0),
        risk_of_ruin,
        ?recommendation,
        "Analytic risk of ruin"
    );

    Ok(RiskOfRuinEstimate {
        probability,
        odds,
        bet_fraction,
        edge,
        kelly_fraction: kelly,
        growth_rate: growth,
        bets_to_double,
        risk_of_ruin,
        overbetting,
        recommendation,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
