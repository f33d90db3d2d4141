// ABOUTME: Volume progression modifiers, distribution caps, and load increment settings
// ABOUTME: Defaults follow the MEV/MAV/MRV phase model and double-progression loading practice
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Volume and Load Progression Configuration
//!
//! Modifiers for the phase-aware weekly volume calculator, set distribution
//! caps, and per-exercise load increments.
//!
//! # Scientific References
//!
//! - Israetel, M., et al. (2019). *The Renaissance Periodization Hypertrophy
//!   Training Guide*: MEV/MAV/MRV landmark model and deload sizing.
//! - Schoenfeld, B.J., Ogborn, D., & Krieger, J.W. (2017). Dose-response
//!   relationship between weekly resistance training volume and muscle growth.
//!   *Journal of Sports Sciences*, 35(11), 1073-1082.

use crate::models::DistributionStrategy;
use serde::{Deserialize, Serialize};

/// Phase-aware weekly volume progression modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeProgressionConfig {
    /// Recovery level below which accumulation volume scales down
    pub low_recovery_level: u8,
    /// Scale applied when recovery is poor
    pub low_recovery_factor: f64,
    /// Recovery level above which well-adapted lifters progress faster
    pub high_recovery_level: u8,
    /// Adaptation level above which well-adapted lifters progress faster
    pub high_adaptation_level: u8,
    /// Scale applied in the high recovery/adaptation case, capped at MAV
    pub high_recovery_factor: f64,
    /// Recovery level required to take full MAV in intensification
    pub intensification_recovery_level: u8,
    /// MAV fraction prescribed when intensification recovery is lacking
    pub intensification_reduced_factor: f64,
    /// MEV fraction prescribed during deload
    pub deload_factor: f64,
    /// MEV fraction used as the non-deload floor
    pub floor_factor: f64,
}

impl Default for VolumeProgressionConfig {
    fn default() -> Self {
        Self {
            low_recovery_level: 4,
            low_recovery_factor: 0.8,
            high_recovery_level: 7,
            high_adaptation_level: 6,
            high_recovery_factor: 1.1,
            intensification_recovery_level: 6,
            intensification_reduced_factor: 0.9,
            deload_factor: 0.7,
            floor_factor: 0.5,
        }
    }
}

/// Set distribution caps and warning thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Strategy used when the caller does not specify one
    pub strategy: DistributionStrategy,
    /// Hard per-exercise weekly set cap
    pub max_sets_per_exercise: u32,
    /// Margin added to the even-share dynamic cap
    pub cap_margin: u32,
    /// Weekly sets on one exercise above which a warning is emitted
    pub per_exercise_warn_threshold: u32,
    /// Allocated-vs-target deviation above which a warning is emitted
    pub target_deviation_warn: u32,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            strategy: DistributionStrategy::Balanced,
            max_sets_per_exercise: 8,
            cap_margin: 2,
            per_exercise_warn_threshold: 6,
            target_deviation_warn: 1,
        }
    }
}

/// Per-exercise load progression increments and ceilings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProgressionConfig {
    /// Standard weight increment for compound lifts, kilograms
    pub compound_increment_kg: f64,
    /// Standard weight increment for isolation lifts, kilograms
    pub isolation_increment_kg: f64,
    /// Load above which the standard increment doubles
    pub high_weight_threshold_kg: f64,
    /// Increment multiplier when the last session was too easy
    pub easy_multiplier: f64,
    /// Rep count at which rep progression rolls over into a weight increase
    pub rep_ceiling: u32,
    /// Reps prescribed after a ceiling-triggered weight increase
    pub rep_reset: u32,
    /// Rep count below which overreached sessions switch to rep progression
    pub rep_switch_threshold: u32,
    /// Fractional weight cut when overreached at high reps
    pub overreach_weight_cut: f64,
}

impl Default for LoadProgressionConfig {
    fn default() -> Self {
        Self {
            compound_increment_kg: 2.5,
            isolation_increment_kg: 0.5,
            high_weight_threshold_kg: 100.0,
            easy_multiplier: 1.5,
            rep_ceiling: 15,
            rep_reset: 8,
            rep_switch_threshold: 12,
            overreach_weight_cut: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deload_below_floor() {
        // Deload intentionally prescribes below the non-deload floor.
        let config = VolumeProgressionConfig::default();
        assert!(config.deload_factor > config.floor_factor);
        assert!(config.deload_factor < 1.0);
    }

    #[test]
    fn test_distribution_caps_ordered() {
        let config = DistributionConfig::default();
        assert!(config.per_exercise_warn_threshold < config.max_sets_per_exercise);
    }
}
