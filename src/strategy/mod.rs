//! Strategy layer: stake sizing, analytic risk screening and scenario
//! synthesis from edge summaries.

pub mod edge;
pub mod kelly;
pub mod risk;

pub use edge::EdgeProfile;
pub use kelly::{growth_rate, kelly_fraction, stake_size};
pub use risk::{estimate_risk_of_ruin, estimate_risk_of_ruin_with, Recommendation, RiskBands, RiskOfRuinEstimate};
