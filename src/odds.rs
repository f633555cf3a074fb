//! Odds conversion utilities.
//!
//! American ↔ decimal ↔ implied probability. Pure functions; zero
//! American odds are rejected rather than defaulted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::SimError;

/// Non-zero American odds (negative = favourite, positive = underdog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    pub fn new(odds: i32) -> Result<Self, SimError> {
        if odds == 0 {
            return Err(SimError::InvalidOdds(odds));
        }
        Ok(Self(odds))
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// Payout multiplier per unit stake, stake included.
    pub fn decimal(&self) -> f64 {
        if self.0 > 0 {
            1.0 + self.0 as f64 / 100.0
        } else {
            1.0 + 100.0 / (self.0 as f64).abs()
        }
    }

    /// Profit per unit stake on a win (`b` in the Kelly formula).
    pub fn net_odds(&self) -> f64 {
        self.decimal() - 1.0
    }

    /// Break-even win probability implied by the price.
    pub fn implied_probability(&self) -> f64 {
        1.0 / self.decimal()
    }

    pub fn is_favourite(&self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<i32> for AmericanOdds {
    type Error = SimError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AmericanOdds> for i32 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Free-function conversions
// ---------------------------------------------------------------------------

/// odds > 0 → 1 + odds/100; odds < 0 → 1 + 100/|odds|.
pub fn american_to_decimal(odds: i32) -> Result<f64, SimError> {
    Ok(AmericanOdds::new(odds)?.decimal())
}

/// Inverse of [`american_to_decimal`], rounded to the nearest integer.
pub fn decimal_to_american(decimal: f64) -> Result<i32, SimError> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(SimError::InvalidDecimalOdds(decimal));
    }
    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        (-100.0 / (decimal - 1.0)).round()
    };
    // Prices within a hair of 1.0 round past i32; clamp and keep the sign.
    Ok(american.clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}

/// 1 / decimal odds.
pub fn implied_probability(odds: i32) -> Result<f64, SimError> {
    Ok(AmericanOdds::new(odds)?.implied_probability())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_odds_to_decimal() {
        assert!((american_to_decimal(150).unwrap() - 2.5).abs() < 1e-12);
        assert!((american_to_decimal(100).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_odds_to_decimal() {
        assert!((american_to_decimal(-200).unwrap() - 1.5).abs() < 1e-12);
        assert!((american_to_decimal(-110).unwrap() - (1.0 + 100.0 / 110.0)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_odds_fail_fast() {
        assert_eq!(american_to_decimal(0), Err(SimError::InvalidOdds(0)));
        assert_eq!(implied_probability(0), Err(SimError::InvalidOdds(0)));
        assert!(AmericanOdds::new(0).is_err());
    }

    #[test]
    fn test_decimal_to_american() {
        assert_eq!(decimal_to_american(2.5).unwrap(), 150);
        assert_eq!(decimal_to_american(1.5).unwrap(), -200);
        assert_eq!(decimal_to_american(2.0).unwrap(), 100);
        assert!(decimal_to_american(1.0).is_err());
        assert!(decimal_to_american(0.5).is_err());
        assert!(decimal_to_american(f64::NAN).is_err());
    }

    #[test]
    fn test_roundtrip_within_one() {
        // Quotes from -100 up to +99 alias other prices in decimal form
        // (-50 and +200 are both 3.0), so only canonical quotes round-trip.
        let samples = [
            -10_000, -1000, -350, -200, -150, -111, -110, -105, -101, 100, 101, 105, 110, 150,
            333, 1000, 25_000,
        ];
        for odds in samples {
            let back = decimal_to_american(american_to_decimal(odds).unwrap()).unwrap();
            assert!(
                (back - odds).abs() <= 1,
                "odds {odds} came back as {back}"
            );
        }
    }

    #[test]
    fn test_implied_probability() {
        assert!((implied_probability(100).unwrap() - 0.5).abs() < 1e-12);
        assert!((implied_probability(-110).unwrap() - 110.0 / 210.0).abs() < 1e-12);
        assert!((implied_probability(300).unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_serde_rejects_zero() {
        let ok: AmericanOdds = serde_json::from_str("-110").unwrap();
        assert_eq!(ok.value(), -110);
        assert!(serde_json::from_str::<AmericanOdds>("0").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "-110");
    }

    #[test]
    fn test_display_signed() {
        assert_eq!(AmericanOdds::new(150).unwrap().to_string(), "+150");
        assert_eq!(AmericanOdds::new(-110).unwrap().to_string(), "-110");
    }
}
