// ABOUTME: Converts five raw post-workout ratings into four composite 0-10 scores
// ABOUTME: Pure weighted linear combinations; deterministic with no error conditions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Feedback scoring
//!
//! Each composite is a fixed weighted linear combination of the five 1-10
//! ratings, rounded to one decimal. Ratings where "higher is worse" for a
//! given composite enter inverted as `10 - rating`. Weight vectors sum to
//! 1.0, so composites inherit the 0-10 scale and are monotonic in every
//! rating direction that should improve them.

use crate::config::ScoringWeightsConfig;
use crate::models::{DerivedScores, FeedbackRecord};

/// Scorer for post-workout feedback records
pub struct FeedbackScorer {
    weights: ScoringWeightsConfig,
}

impl Default for FeedbackScorer {
    fn default() -> Self {
        Self::new(ScoringWeightsConfig::default())
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl FeedbackScorer {
    /// Create a scorer with the given weight vectors
    #[must_use]
    pub const fn new(weights: ScoringWeightsConfig) -> Self {
        Self { weights }
    }

    /// Score a feedback record into the four composites
    ///
    /// Ratings are assumed validated at the boundary; this function is pure
    /// and never fails.
    #[must_use]
    pub fn score(&self, record: &FeedbackRecord) -> DerivedScores {
        let pump = f64::from(record.pump_quality);
        let soreness = f64::from(record.muscle_soreness);
        let effort = f64::from(record.perceived_effort);
        let energy = f64::from(record.energy_level);
        let sleep = f64::from(record.sleep_quality);

        let w = &self.weights;

        let recovery = w.recovery_energy * energy
            + w.recovery_sleep * sleep
            + w.recovery_inverse_soreness * (10.0 - soreness)
            + w.recovery_pump * pump;

        let adaptation = w.adaptation_pump * pump
            + w.adaptation_inverse_soreness * (10.0 - soreness)
            + w.adaptation_inverse_effort * (10.0 - effort)
            + w.adaptation_energy * energy;

        let fatigue = w.fatigue_soreness * soreness
            + w.fatigue_effort * effort
            + w.fatigue_inverse_energy * (10.0 - energy)
            + w.fatigue_inverse_sleep * (10.0 - sleep);

        let recovery = round_one_decimal(recovery);
        let adaptation = round_one_decimal(adaptation);

        DerivedScores {
            recovery_score: recovery,
            adaptation_score: adaptation,
            fatigue_score: round_one_decimal(fatigue),
            overall_readiness: round_one_decimal((recovery + adaptation) / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(pump: u8, soreness: u8, effort: u8, energy: u8, sleep: u8) -> FeedbackRecord {
        FeedbackRecord {
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            pump_quality: pump,
            muscle_soreness: soreness,
            perceived_effort: effort,
            energy_level: energy,
            sleep_quality: sleep,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_recovery_formula() {
        // recovery = 0.35*8 + 0.30*7 + 0.20*(10-3) + 0.15*6 = 7.2
        let scores = FeedbackScorer::default().score(&record(6, 3, 7, 8, 7));
        assert!((scores.recovery_score - 7.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scores_within_range_for_all_extremes() {
        let scorer = FeedbackScorer::default();
        for pump in [1, 10] {
            for soreness in [1, 10] {
                for effort in [1, 10] {
                    for energy in [1, 10] {
                        for sleep in [1, 10] {
                            let s = scorer.score(&record(pump, soreness, effort, energy, sleep));
                            for value in [
                                s.recovery_score,
                                s.adaptation_score,
                                s.fatigue_score,
                                s.overall_readiness,
                            ] {
                                assert!((0.0..=10.0).contains(&value), "{value} out of range");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_recovery_monotonic_in_sleep() {
        let scorer = FeedbackScorer::default();
        let mut previous = -1.0;
        for sleep in 1..=10 {
            let scores = scorer.score(&record(5, 5, 5, 5, sleep));
            assert!(scores.recovery_score >= previous);
            previous = scores.recovery_score;
        }
    }

    #[test]
    fn test_fatigue_monotonic_in_soreness() {
        let scorer = FeedbackScorer::default();
        let mut previous = -1.0;
        for soreness in 1..=10 {
            let scores = scorer.score(&record(5, soreness, 5, 5, 5));
            assert!(scores.fatigue_score >= previous);
            previous = scores.fatigue_score;
        }
    }

    #[test]
    fn test_overall_readiness_is_mean() {
        let scores = FeedbackScorer::default().score(&record(7, 4, 6, 8, 7));
        let expected = (scores.recovery_score + scores.adaptation_score) / 2.0;
        assert!((scores.overall_readiness - (expected * 10.0).round() / 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_decimal_rounding() {
        let scores = FeedbackScorer::default().score(&record(3, 7, 9, 4, 5));
        for value in [scores.recovery_score, scores.fatigue_score] {
            assert!(((value * 10.0).round() / 10.0 - value).abs() < f64::EPSILON);
        }
    }
}
