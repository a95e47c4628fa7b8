//! # Confidence Scoring
//!
//! Pure, deterministic confidence function shared by every evaluator.
//!
//! Four bounded quality factors map to a confidence in [0.10, 1.00]:
//! familiarity and data quality reward linearly, while complexity and risk
//! penalize harder than familiarity rewards, keeping scores bounded away
//! from both total unreliability and overclaimed certainty.

use serde::{Deserialize, Serialize};

/// Lower bound for any confidence value
pub const MIN_CONFIDENCE: f64 = 0.10;

/// Upper bound for any confidence value
pub const MAX_CONFIDENCE: f64 = 1.00;

/// Per-point penalty for complexity above the floor
const COMPLEXITY_PENALTY_STEP: f64 = 0.10;

/// Per-point penalty for risk above the floor
const RISK_PENALTY_STEP: f64 = 0.15;

/// The four quality factors, each clamped into [1, 5] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoringFactors {
    complexity: u8,
    familiarity: u8,
    risk_level: u8,
    data_quality: u8,
}

impl ScoringFactors {
    /// Build a factor set, clamping every input into the valid [1, 5] range.
    pub fn new(complexity: u8, familiarity: u8, risk_level: u8, data_quality: u8) -> Self {
        Self {
            complexity: clamp_factor(complexity),
            familiarity: clamp_factor(familiarity),
            risk_level: clamp_factor(risk_level),
            data_quality: clamp_factor(data_quality),
        }
    }

    pub fn complexity(&self) -> u8 {
        self.complexity
    }

    pub fn familiarity(&self) -> u8 {
        self.familiarity
    }

    pub fn risk_level(&self) -> u8 {
        self.risk_level
    }

    pub fn data_quality(&self) -> u8 {
        self.data_quality
    }
}

fn clamp_factor(value: u8) -> u8 {
    value.clamp(1, 5)
}

/// Score a factor set into a confidence value.
///
/// Total over all factor tuples: no error cases, no side effects. The result
/// is clamped to [0.10, 1.00] and rounded to two decimal places.
pub fn score(factors: ScoringFactors) -> f64 {
    let base = f64::from(factors.familiarity + factors.data_quality) / 2.0;
    let complexity_penalty = f64::from(factors.complexity - 1) * COMPLEXITY_PENALTY_STEP;
    let risk_penalty = f64::from(factors.risk_level - 1) * RISK_PENALTY_STEP;
    let raw = base / 5.0 - complexity_penalty - risk_penalty;

    round_2dp(raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE))
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_case_is_full_confidence() {
        let factors = ScoringFactors::new(1, 5, 1, 5);
        assert_eq!(score(factors), 1.0);
    }

    #[test]
    fn test_worst_case_clamps_to_floor() {
        let factors = ScoringFactors::new(5, 1, 5, 1);
        assert_eq!(score(factors), MIN_CONFIDENCE);
    }

    #[test]
    fn test_mid_range_value() {
        // base = (3 + 3) / 2 = 3, raw = 0.6 - 0.2 - 0.3 = 0.1
        let factors = ScoringFactors::new(3, 3, 3, 3);
        assert_eq!(score(factors), 0.10);

        // base = (4 + 4) / 2 = 4, raw = 0.8 - 0.1 - 0.15 = 0.55
        let factors = ScoringFactors::new(2, 4, 2, 4);
        assert_eq!(score(factors), 0.55);
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        assert_eq!(
            ScoringFactors::new(0, 9, 0, 9),
            ScoringFactors::new(1, 5, 1, 5)
        );
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        for complexity in 1..=5u8 {
            for familiarity in 1..=5u8 {
                for risk in 1..=5u8 {
                    for quality in 1..=5u8 {
                        let value = score(ScoringFactors::new(complexity, familiarity, risk, quality));
                        let scaled = value * 100.0;
                        assert!((scaled - scaled.round()).abs() < 1e-9);
                    }
                }
            }
        }
    }
}
