//! Property-based tests for the confidence scoring function.
//!
//! The scorer is pure and total over `[1,5]^4`, so every property can be
//! checked exhaustively or by sampling without any async setup.

use proptest::prelude::*;
use quorum_core::scoring::{score, ScoringFactors, MAX_CONFIDENCE, MIN_CONFIDENCE};

fn factor() -> impl Strategy<Value = u8> {
    1..=5u8
}

proptest! {
    /// Property: output is always inside [0.10, 1.00]
    #[test]
    fn confidence_stays_in_bounds(
        complexity in factor(),
        familiarity in factor(),
        risk in factor(),
        quality in factor(),
    ) {
        let value = score(ScoringFactors::new(complexity, familiarity, risk, quality));
        prop_assert!(value >= MIN_CONFIDENCE, "below floor: {value}");
        prop_assert!(value <= MAX_CONFIDENCE, "above ceiling: {value}");
    }

    /// Property: raising complexity never raises confidence
    #[test]
    fn non_increasing_in_complexity(
        complexity in 1..5u8,
        familiarity in factor(),
        risk in factor(),
        quality in factor(),
    ) {
        let lower = score(ScoringFactors::new(complexity, familiarity, risk, quality));
        let higher = score(ScoringFactors::new(complexity + 1, familiarity, risk, quality));
        prop_assert!(higher <= lower);
    }

    /// Property: raising risk never raises confidence
    #[test]
    fn non_increasing_in_risk(
        complexity in factor(),
        familiarity in factor(),
        risk in 1..5u8,
        quality in factor(),
    ) {
        let lower = score(ScoringFactors::new(complexity, familiarity, risk, quality));
        let higher = score(ScoringFactors::new(complexity, familiarity, risk + 1, quality));
        prop_assert!(higher <= lower);
    }

    /// Property: raising familiarity never lowers confidence
    #[test]
    fn non_decreasing_in_familiarity(
        complexity in factor(),
        familiarity in 1..5u8,
        risk in factor(),
        quality in factor(),
    ) {
        let lower = score(ScoringFactors::new(complexity, familiarity, risk, quality));
        let higher = score(ScoringFactors::new(complexity, familiarity + 1, risk, quality));
        prop_assert!(higher >= lower);
    }

    /// Property: raising data quality never lowers confidence
    #[test]
    fn non_decreasing_in_data_quality(
        complexity in factor(),
        familiarity in factor(),
        risk in factor(),
        quality in 1..5u8,
    ) {
        let lower = score(ScoringFactors::new(complexity, familiarity, risk, quality));
        let higher = score(ScoringFactors::new(complexity, familiarity, risk, quality + 1));
        prop_assert!(higher >= lower);
    }

    /// Property: inputs outside [1,5] are clamped, never rejected
    #[test]
    fn arbitrary_inputs_are_total(
        complexity in any::<u8>(),
        familiarity in any::<u8>(),
        risk in any::<u8>(),
        quality in any::<u8>(),
    ) {
        let value = score(ScoringFactors::new(complexity, familiarity, risk, quality));
        prop_assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&value));
    }
}

/// The full factor space is only 625 tuples; check the rounding contract on
/// every one of them.
#[test]
fn every_tuple_rounds_to_two_decimals() {
    for complexity in 1..=5u8 {
        for familiarity in 1..=5u8 {
            for risk in 1..=5u8 {
                for quality in 1..=5u8 {
                    let value = score(ScoringFactors::new(complexity, familiarity, risk, quality));
                    let scaled = value * 100.0;
                    assert!(
                        (scaled - scaled.round()).abs() < 1e-9,
                        "({complexity},{familiarity},{risk},{quality}) -> {value} is not 2dp"
                    );
                }
            }
        }
    }
}

#[test]
fn known_values_match_the_formula() {
    // base 4, penalties 0.1 + 0.15
    assert_eq!(score(ScoringFactors::new(2, 4, 2, 4)), 0.55);
    // all-middling factors bottom out just above the floor
    assert_eq!(score(ScoringFactors::new(3, 3, 3, 3)), 0.10);
    // best case saturates at the ceiling
    assert_eq!(score(ScoringFactors::new(1, 5, 1, 5)), 1.00);
}
