// ABOUTME: Per-exercise weight and rep prescription from RPE/RIR effort feedback
// ABOUTME: Rule-ordered double progression with a history-trend override and confidence scoring
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Load progression
//!
//! Prescribes next-week weight and reps for one exercise from the last known
//! performance. Rules apply in priority order: the RPE 8-8.5 / RIR 1-2 sweet
//! spot earns a standard weight increment, too-easy sessions earn 1.5x,
//! overreached sessions switch to rep progression or cut load, and the
//! moderate zone runs double progression up to a rep ceiling.
//!
//! A trend classification over the last three or more weeks overrides the
//! base rule: plateaus halve the increment, declines force reps-only work.

use crate::config::LoadProgressionConfig;
use crate::models::{ExerciseCategory, LoadProgressionRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which variable the recommendation progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressionType {
    /// Increase (or cut) the load
    Weight,
    /// Hold the load, change the reps
    Reps,
    /// Hold reps, consolidate at reduced load
    Volume,
}

/// Trend over recent progression history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressionTrend {
    /// Weights mostly rising week to week
    Improving,
    /// As many drops as rises
    Plateauing,
    /// Weights mostly falling
    Declining,
}

/// Last known performance for one exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExercisePerformance {
    /// Catalog exercise
    pub exercise_id: Uuid,
    /// Compound or isolation
    pub category: ExerciseCategory,
    /// Load used, kilograms
    pub weight: f64,
    /// Reps per set achieved
    pub reps: u32,
    /// Rate of perceived exertion (1-10)
    pub rpe: f64,
    /// Reps in reserve
    pub rir: f64,
}

/// A weight/rep prescription with confidence and reasoning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRecommendation {
    /// Prescribed load, kilograms
    pub recommended_weight: f64,
    /// Prescribed reps per set
    pub recommended_reps: u32,
    /// Variable being progressed
    pub progression_type: ProgressionType,
    /// Confidence in the prescription (0-1)
    pub confidence: f64,
    /// Human-readable justification, one entry per applied rule
    pub reasoning: Vec<String>,
}

/// Advisor computing weight/rep prescriptions from effort feedback
pub struct LoadProgressionAdvisor {
    config: LoadProgressionConfig,
}

impl Default for LoadProgressionAdvisor {
    fn default() -> Self {
        Self::new(LoadProgressionConfig::default())
    }
}

fn round_quarter_kg(weight: f64) -> f64 {
    (weight * 4.0).round() / 4.0
}

impl LoadProgressionAdvisor {
    /// Create an advisor with the given increments
    #[must_use]
    pub const fn new(config: LoadProgressionConfig) -> Self {
        Self { config }
    }

    /// Classify the trend across consecutive weights in recent history
    ///
    /// Returns `None` for fewer than three records. Counts increase vs
    /// decrease transitions between consecutive weeks.
    #[must_use]
    pub fn classify_trend(history: &[LoadProgressionRecord]) -> Option<ProgressionTrend> {
        if history.len() < 3 {
            return None;
        }
        let mut increases = 0u32;
        let mut decreases = 0u32;
        for pair in history.windows(2) {
            if pair[1].weight > pair[0].weight {
                increases += 1;
            } else if pair[1].weight < pair[0].weight {
                decreases += 1;
            }
        }
        Some(if increases > decreases {
            ProgressionTrend::Improving
        } else if decreases > increases {
            ProgressionTrend::Declining
        } else {
            ProgressionTrend::Plateauing
        })
    }

    /// Recommend next-week weight and reps for an exercise
    ///
    /// `history` must be ordered oldest week first.
    #[must_use]
    pub fn recommend(
        &self,
        performance: &ExercisePerformance,
        history: &[LoadProgressionRecord],
    ) -> LoadRecommendation {
        let trend = Self::classify_trend(history);

        if trend == Some(ProgressionTrend::Declining) {
            return self.declining_recommendation(performance);
        }

        let mut recommendation = self.base_recommendation(performance, trend);

        if trend == Some(ProgressionTrend::Plateauing) {
            recommendation.confidence = (recommendation.confidence - 0.2).max(0.0);
            recommendation
                .reasoning
                .push("Recent weights are plateauing; progression tempered".to_owned());
        }
        recommendation
    }

    fn base_recommendation(
        &self,
        performance: &ExercisePerformance,
        trend: Option<ProgressionTrend>,
    ) -> LoadRecommendation {
        let c = &self.config;
        let mut increment = self.standard_increment(performance);
        if trend == Some(ProgressionTrend::Plateauing) {
            increment /= 2.0;
        }

        let rpe = performance.rpe;
        let rir = performance.rir;

        // Rule 1: the productive sweet spot earns the standard increment.
        if (8.0..=8.5).contains(&rpe) && (1.0..=2.0).contains(&rir) {
            return LoadRecommendation {
                recommended_weight: round_quarter_kg(performance.weight + increment),
                recommended_reps: performance.reps,
                progression_type: ProgressionType::Weight,
                confidence: 0.9,
                reasoning: vec![format!(
                    "RPE {rpe:.1} and RIR {rir:.1} in the productive zone; adding {increment:.2} kg"
                )],
            };
        }

        // Rule 2: clearly too easy.
        if rpe < 7.0 || rir > 3.0 {
            let boosted = increment * c.easy_multiplier;
            return LoadRecommendation {
                recommended_weight: round_quarter_kg(performance.weight + boosted),
                recommended_reps: performance.reps,
                progression_type: ProgressionType::Weight,
                confidence: 0.8,
                reasoning: vec![format!(
                    "Last session was too easy (RPE {rpe:.1}, RIR {rir:.1}); adding {boosted:.2} kg"
                )],
            };
        }

        // Rule 3: overreached.
        if rpe > 9.0 || rir < 1.0 {
            if performance.reps < c.rep_switch_threshold {
                return LoadRecommendation {
                    recommended_weight: performance.weight,
                    recommended_reps: performance.reps + 1,
                    progression_type: ProgressionType::Reps,
                    confidence: 0.6,
                    reasoning: vec![format!(
                        "Overreached (RPE {rpe:.1}, RIR {rir:.1}); holding load, progressing reps"
                    )],
                };
            }
            let reduced = performance.weight * (1.0 - c.overreach_weight_cut);
            return LoadRecommendation {
                recommended_weight: round_quarter_kg(reduced),
                recommended_reps: performance.reps,
                progression_type: ProgressionType::Volume,
                confidence: 0.6,
                reasoning: vec![format!(
                    "Overreached at high reps; reducing load {:.0}% to consolidate",
                    c.overreach_weight_cut * 100.0
                )],
            };
        }

        // Rule 4: moderate zone, double progression toward the rep ceiling.
        if performance.reps >= c.rep_ceiling {
            return LoadRecommendation {
                recommended_weight: round_quarter_kg(performance.weight + increment),
                recommended_reps: c.rep_reset,
                progression_type: ProgressionType::Weight,
                confidence: 0.75,
                reasoning: vec![format!(
                    "Rep ceiling of {} reached; adding {increment:.2} kg and resetting reps to {}",
                    c.rep_ceiling, c.rep_reset
                )],
            };
        }
        LoadRecommendation {
            recommended_weight: performance.weight,
            recommended_reps: performance.reps + 1,
            progression_type: ProgressionType::Reps,
            confidence: 0.7,
            reasoning: vec![format!(
                "Moderate effort (RPE {rpe:.1}); adding a rep toward the {} ceiling",
                c.rep_ceiling
            )],
        }
    }

    fn declining_recommendation(&self, performance: &ExercisePerformance) -> LoadRecommendation {
        let reps = if performance.reps >= self.config.rep_ceiling {
            performance.reps
        } else {
            performance.reps + 1
        };
        LoadRecommendation {
            recommended_weight: performance.weight,
            recommended_reps: reps,
            progression_type: ProgressionType::Reps,
            confidence: 0.4,
            reasoning: vec![
                "Declining weight trend over recent weeks; holding load and progressing reps only"
                    .to_owned(),
            ],
        }
    }

    fn standard_increment(&self, performance: &ExercisePerformance) -> f64 {
        let base = match performance.category {
            ExerciseCategory::Compound => self.config.compound_increment_kg,
            ExerciseCategory::Isolation => self.config.isolation_increment_kg,
        };
        if performance.weight > self.config.high_weight_threshold_kg {
            base * 2.0
        } else {
            base
        }
    }
}
