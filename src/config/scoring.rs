// ABOUTME: Feedback scoring weight vectors and fatigue analysis thresholds
// ABOUTME: Defaults tuned so composite scores stay in 0-10 and monotonicity properties hold
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Feedback Scoring and Fatigue Analysis Configuration
//!
//! Weight vectors for the composite recovery/adaptation/fatigue scores and
//! the rolling-window thresholds that drive deload recommendations.
//!
//! # Scientific References
//!
//! - Helms, E.R., et al. (2018). RPE vs. percentage 1RM loading in periodized
//!   programs. *Frontiers in Physiology*, 9, 247.
//! - Israetel, M., Hoffmann, J., & Smith, C.W. (2017). *Scientific Principles
//!   of Strength Training*. Renaissance Periodization.

use serde::{Deserialize, Serialize};

/// Weight vectors for the four composite feedback scores
///
/// Each vector sums to 1.0 so composites inherit the 0-10 rating scale.
/// "Inverse" weights apply to `10 - rating` for ratings where higher is worse
/// (or, for fatigue, where higher is better).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeightsConfig {
    /// Recovery score: weight on energy level
    pub recovery_energy: f64,
    /// Recovery score: weight on sleep quality
    pub recovery_sleep: f64,
    /// Recovery score: weight on inverted soreness
    pub recovery_inverse_soreness: f64,
    /// Recovery score: weight on pump quality
    pub recovery_pump: f64,

    /// Adaptation score: weight on pump quality
    pub adaptation_pump: f64,
    /// Adaptation score: weight on inverted soreness
    pub adaptation_inverse_soreness: f64,
    /// Adaptation score: weight on inverted perceived effort
    pub adaptation_inverse_effort: f64,
    /// Adaptation score: weight on energy level
    pub adaptation_energy: f64,

    /// Fatigue score: weight on soreness
    pub fatigue_soreness: f64,
    /// Fatigue score: weight on perceived effort
    pub fatigue_effort: f64,
    /// Fatigue score: weight on inverted energy level
    pub fatigue_inverse_energy: f64,
    /// Fatigue score: weight on inverted sleep quality
    pub fatigue_inverse_sleep: f64,
}

impl Default for ScoringWeightsConfig {
    fn default() -> Self {
        Self {
            recovery_energy: 0.35,
            recovery_sleep: 0.30,
            recovery_inverse_soreness: 0.20,
            recovery_pump: 0.15,

            adaptation_pump: 0.30,
            adaptation_inverse_soreness: 0.25,
            adaptation_inverse_effort: 0.25,
            adaptation_energy: 0.20,

            fatigue_soreness: 0.30,
            fatigue_effort: 0.25,
            fatigue_inverse_energy: 0.25,
            fatigue_inverse_sleep: 0.20,
        }
    }
}

/// Rolling-window fatigue analysis thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueAnalysisConfig {
    /// Feedback history window in days
    pub window_days: u32,
    /// Minimum half-to-half recovery score delta to call a trend
    pub trend_threshold: f64,
    /// Average pump below this recommends a deload
    pub min_avg_pump: f64,
    /// Average soreness above this recommends a deload
    pub max_avg_soreness: f64,
    /// Average perceived effort above this recommends a deload
    pub max_avg_effort: f64,
    /// Average energy below this recommends a deload
    pub min_avg_energy: f64,
    /// Average sleep quality below this recommends a deload
    pub min_avg_sleep: f64,
    /// Overall fatigue score above this recommends a deload
    pub max_overall_fatigue: f64,
    /// Per-record fatigue score counted as acutely fatigued
    pub acute_fatigue_score: f64,
    /// Number of most-recent records examined for acute fatigue
    pub acute_window: usize,
    /// Acutely fatigued records within the window that trigger a deload
    pub acute_trigger_count: usize,
    /// Fatigue score reported when the history is empty
    pub neutral_fatigue: f64,
}

impl Default for FatigueAnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: 10,
            trend_threshold: 0.5,
            min_avg_pump: 6.0,
            max_avg_soreness: 7.0,
            max_avg_effort: 8.0,
            min_avg_energy: 5.0,
            min_avg_sleep: 5.0,
            max_overall_fatigue: 6.5,
            acute_fatigue_score: 7.0,
            acute_window: 3,
            acute_trigger_count: 2,
            neutral_fatigue: 5.0,
        }
    }
}
