//! Scenario synthesis from summary edge parameters.
//!
//! Upstream edge estimation usually reports an average edge and its
//! spread rather than individual opportunities. [`EdgeProfile`] expands
//! those summaries into a diversified, simulate-able scenario pool.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::odds::AmericanOdds;
use crate::types::{Scenario, SimError};

/// Synthesized probabilities never exceed this, however large the edge.
pub const MAX_SYNTHESIZED_PROBABILITY: f64 = 0.95;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Summary description of available opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeProfile {
    /// Mean edge over implied probability (0.03 = 3 points).
    pub avg_edge: f64,
    /// Half-width of the uniform noise added to `avg_edge`.
    pub edge_variance: f64,
    /// Sign decides whether favourites (−) or underdogs (+) are synthesized.
    pub avg_odds: i32,
    /// Inclusive range of odds magnitudes to draw from, e.g. (100, 200).
    pub odds_range: (u32, u32),
    pub num_scenarios: usize,
}

impl Default for EdgeProfile {
    fn default() -> Self {
        Self {
            avg_edge: 0.03,
            edge_variance: 0.02,
            avg_odds: -110,
            odds_range: (100, 200),
            num_scenarios: 20,
        }
    }
}

impl EdgeProfile {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.num_scenarios == 0 {
            return Err(SimError::EmptyScenarioPool);
        }
        if self.avg_odds == 0 {
            return Err(SimError::InvalidOdds(self.avg_odds));
        }
        let (lo, hi) = self.odds_range;
        if lo == 0 || lo > hi || hi > i32::MAX as u32 {
            return Err(SimError::InvalidEdgeProfile(format!(
                "odds range ({lo}, {hi}) must be non-zero and ordered"
            )));
        }
        if !self.avg_edge.is_finite() || !self.edge_variance.is_finite() || self.edge_variance < 0.0 {
            return Err(SimError::InvalidEdgeProfile(format!(
                "edge {} ± {} must be finite with non-negative spread",
                self.avg_edge, self.edge_variance
            )));
        }
        Ok(())
    }

    /// Generate `num_scenarios` scenarios:
    /// 1. odds magnitude uniform in `odds_range`, signed like `avg_odds`;
    /// 2. edge = max(0, avg_edge + U(−variance, variance));
    /// 3. probability = min(0.95, implied + edge).
    pub fn synthesize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Scenario>, SimError> {
        self.validate()?;

        let (lo, hi) = self.odds_range;
        let sign = self.avg_odds.signum();
        let mut pool = Vec::with_capacity(self.num_scenarios);

        for _ in 0..self.num_scenarios {
            let magnitude = rng.gen_range(lo..=hi) as i32;
            let odds = AmericanOdds::new(sign * magnitude)?;

            let noise = if self.edge_variance > 0.0 {
                rng.gen_range(-self.edge_variance..=self.edge_variance)
            } else {
                0.0
            };
            let edge = (self.avg_edge + noise).max(0.0);
            let implied = odds.implied_probability();
            let probability = (implied + edge).min(MAX_SYNTHESIZED_PROBABILITY);

            pool.push(Scenario::with_edge(probability, odds, probability - implied)?);
        }

        debug!(
            count = pool.len(),
            avg_edge = self.avg_edge,
            avg_odds = self.avg_odds,
            "Scenario pool synthesized"
        );
        Ok(pool)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
