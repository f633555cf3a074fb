//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section is optional and falls back to its `Default`.

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::fs;
use tracing::info;

use crate::odds::AmericanOdds;
use crate::simulation::SimulationConfig;
use crate::strategy::{EdgeProfile, RiskBands};
use crate::types::{Scenario, StrategyConfig};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub strategy: StrategyConfig,
    /// Explicit scenario pool. Takes precedence over `edge_profile`.
    pub scenarios: Vec<ScenarioConfig>,
    pub edge_profile: Option<EdgeProfile>,
    pub risk_bands: RiskBands,
}

/// One `[[scenarios]]` entry.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ScenarioConfig {
    pub probability: f64,
    pub odds: i32,
    /// Overrides the derived edge when present.
    #[serde(default)]
    pub edge: Option<f64>,
}

impl ScenarioConfig {
    pub fn to_scenario(&self) -> Result<Scenario> {
        let odds = AmericanOdds::new(self.odds)?;
        let scenario = match self.edge {
            Some(edge) => Scenario::with_edge(self.probability, odds, edge)?,
            None => Scenario::new(self.probability, odds)?,
        };
        Ok(scenario)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Build the scenario pool: explicit `[[scenarios]]` if any, otherwise
    /// synthesized from `[edge_profile]` (or its defaults).
    ///
    /// Synthesis is seeded from `simulation.seed` when set.
    pub fn scenario_pool(&self) -> Result<Vec<Scenario>> {
        if !self.scenarios.is_empty() {
            return self
                .scenarios
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    s.to_scenario()
                        .with_context(|| format!("Invalid scenario #{}", i + 1))
                })
                .collect();
        }

        let profile = self.edge_profile.unwrap_or_default();
        let seed = match self.simulation.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::thread_rng().gen();
                info!(seed, "No seed configured, drew one for scenario synthesis");
                seed
            }
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pool = profile
            .synthesize(&mut rng)
            .context("Failed to synthesize scenarios from edge profile")?;

        info!(
            scenarios = pool.len(),
            avg_edge = format!("{:.2}%", profile.avg_edge * 100.0),
            avg_odds = profile.avg_odds,
            seed,
            "Synthesized scenario pool"
        );
        Ok(pool)
    }
}
