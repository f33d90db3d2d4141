// ABOUTME: Phase-aware weekly set target calculation from volume landmarks
// ABOUTME: Accumulation interpolates MEV toward MAV; intensification peaks at MAV; deload cuts below MEV
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Volume progression
//!
//! Pure function of `(current_week, total_weeks, landmark)`. The mesocycle is
//! three-phased: accumulation runs through week `total_weeks - 2`,
//! intensification is week `total_weeks - 1`, deload is the final week.
//!
//! Targets are floored at half MEV in every phase except deload, where
//! dropping below MEV is the point.

use crate::config::VolumeProgressionConfig;
use crate::models::{MesocyclePhase, VolumeLandmark};
use serde::{Deserialize, Serialize};

/// A muscle group's computed weekly volume target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeTarget {
    /// Prescribed weekly sets
    pub target_sets: u32,
    /// Phase the week falls in
    pub phase: MesocyclePhase,
}

/// Phase-aware weekly volume calculator
pub struct VolumeProgressionCalculator {
    config: VolumeProgressionConfig,
}

impl Default for VolumeProgressionCalculator {
    fn default() -> Self {
        Self::new(VolumeProgressionConfig::default())
    }
}

impl VolumeProgressionCalculator {
    /// Create a calculator with the given modifiers
    #[must_use]
    pub const fn new(config: VolumeProgressionConfig) -> Self {
        Self { config }
    }

    /// Phase for a week position within a mesocycle
    #[must_use]
    pub fn phase_for_week(current_week: u32, total_weeks: u32) -> MesocyclePhase {
        if current_week >= total_weeks {
            MesocyclePhase::Deload
        } else if current_week + 1 == total_weeks {
            MesocyclePhase::Intensification
        } else {
            MesocyclePhase::Accumulation
        }
    }

    /// Compute the weekly set target for one muscle group
    ///
    /// `current_week` is 1-based. Weeks past `total_weeks` saturate to the
    /// deload prescription.
    #[must_use]
    pub fn calculate(
        &self,
        current_week: u32,
        total_weeks: u32,
        landmark: &VolumeLandmark,
    ) -> VolumeTarget {
        let phase = Self::phase_for_week(current_week, total_weeks);
        let raw = match phase {
            MesocyclePhase::Accumulation => self.accumulation_target(current_week, total_weeks, landmark),
            MesocyclePhase::Intensification => self.intensification_target(landmark),
            MesocyclePhase::Deload => self.config.deload_factor * f64::from(landmark.mev),
        };

        let mut target_sets = raw.round().max(0.0) as u32;
        if phase != MesocyclePhase::Deload {
            let floor = (self.config.floor_factor * f64::from(landmark.mev)).round() as u32;
            target_sets = target_sets.max(floor);
        }

        VolumeTarget { target_sets, phase }
    }

    fn accumulation_target(
        &self,
        current_week: u32,
        total_weeks: u32,
        landmark: &VolumeLandmark,
    ) -> f64 {
        let c = &self.config;
        let mev = f64::from(landmark.mev);
        let mav = f64::from(landmark.mav);

        let accumulation_span = total_weeks.saturating_sub(2).max(1);
        // Week 0 means the block has not started; treat it as week 1.
        let fraction = f64::from(current_week.saturating_sub(1)) / f64::from(accumulation_span);
        let mut target = (mav - mev).mul_add(fraction, mev);

        if landmark.recovery_level < c.low_recovery_level {
            target *= c.low_recovery_factor;
        } else if landmark.recovery_level > c.high_recovery_level
            && landmark.adaptation_level > c.high_adaptation_level
        {
            target = (target * c.high_recovery_factor).min(mav);
        }

        target
    }

    fn intensification_target(&self, landmark: &VolumeLandmark) -> f64 {
        let mav = f64::from(landmark.mav);
        if landmark.recovery_level >= self.config.intensification_recovery_level {
            mav
        } else {
            mav * self.config.intensification_reduced_factor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn landmark(mev: u32, mav: u32, mrv: u32, recovery: u8, adaptation: u8) -> VolumeLandmark {
        VolumeLandmark {
            user_id: Uuid::new_v4(),
            muscle_group_id: Uuid::new_v4(),
            mv: 4,
            mev,
            mav,
            mrv,
            current_volume: 0,
            target_volume: 0,
            recovery_level: recovery,
            adaptation_level: adaptation,
            version: 1,
        }
    }

    #[test]
    fn test_week_one_starts_at_mev() {
        let calc = VolumeProgressionCalculator::default();
        let target = calc.calculate(1, 6, &landmark(8, 16, 22, 6, 5));
        assert_eq!(target.target_sets, 8);
        assert_eq!(target.phase, MesocyclePhase::Accumulation);
    }

    #[test]
    fn test_week_zero_clamps_to_mev() {
        let calc = VolumeProgressionCalculator::default();
        // A not-yet-started block reports week 0; no underflow, MEV target.
        let target = calc.calculate(0, 6, &landmark(8, 16, 22, 6, 5));
        assert_eq!(target.target_sets, 8);
        assert_eq!(target.phase, MesocyclePhase::Accumulation);
    }

    #[test]
    fn test_accumulation_interpolates_toward_mav() {
        let calc = VolumeProgressionCalculator::default();
        // Linear across the 4-week accumulation span of a 6-week block.
        assert_eq!(calc.calculate(2, 6, &landmark(8, 16, 22, 6, 5)).target_sets, 10);
        assert_eq!(calc.calculate(3, 6, &landmark(8, 16, 22, 6, 5)).target_sets, 12);
        assert_eq!(calc.calculate(4, 6, &landmark(8, 16, 22, 6, 5)).target_sets, 14);
    }

    #[test]
    fn test_intensification_at_full_mav_when_recovered() {
        let calc = VolumeProgressionCalculator::default();
        let target = calc.calculate(5, 6, &landmark(8, 16, 22, 7, 5));
        assert_eq!(target.phase, MesocyclePhase::Intensification);
        assert_eq!(target.target_sets, 16);
    }

    #[test]
    fn test_intensification_reduced_when_under_recovered() {
        let calc = VolumeProgressionCalculator::default();
        let target = calc.calculate(5, 6, &landmark(8, 16, 22, 5, 5));
        assert_eq!(target.target_sets, 14); // 0.9 * 16, rounded
    }

    #[test]
    fn test_final_week_is_deload_at_seventy_percent_mev() {
        let calc = VolumeProgressionCalculator::default();
        let target = calc.calculate(6, 6, &landmark(8, 16, 22, 6, 5));
        assert_eq!(target.phase, MesocyclePhase::Deload);
        assert_eq!(target.target_sets, 6); // round(8 * 0.7)
    }

    #[test]
    fn test_deload_drops_below_mev() {
        let calc = VolumeProgressionCalculator::default();
        let lm = landmark(10, 18, 24, 6, 5);
        let target = calc.calculate(4, 4, &lm);
        assert_eq!(target.target_sets, 7); // round(10 * 0.7)
        assert!(target.target_sets < lm.mev);
    }

    #[test]
    fn test_low_recovery_scales_down() {
        let calc = VolumeProgressionCalculator::default();
        // Week 3 of 6: base 12, scaled by 0.8.
        let target = calc.calculate(3, 6, &landmark(8, 16, 22, 3, 5));
        assert_eq!(target.target_sets, 10); // round(12 * 0.8)
    }

    #[test]
    fn test_high_recovery_scales_up_capped_at_mav() {
        let calc = VolumeProgressionCalculator::default();
        // Week 4 of 6: base 14, scaled by 1.1 = 15.4.
        let target = calc.calculate(4, 6, &landmark(8, 16, 22, 8, 7));
        assert_eq!(target.target_sets, 15);

        // Late in a longer block the 1.1 scale would exceed MAV; capped.
        let target = calc.calculate(7, 9, &landmark(8, 16, 22, 8, 7));
        assert!(target.target_sets <= 16);
    }

    #[test]
    fn test_floor_at_half_mev_outside_deload() {
        let calc = VolumeProgressionCalculator::default();
        // Poor recovery on week 1: 8 * 0.8 = 6.4, floor is 4, result 6.
        let target = calc.calculate(1, 6, &landmark(8, 16, 22, 2, 5));
        assert!(target.target_sets >= 4);
    }

    #[test]
    fn test_week_past_total_saturates_to_deload() {
        let calc = VolumeProgressionCalculator::default();
        let target = calc.calculate(9, 6, &landmark(8, 16, 22, 6, 5));
        assert_eq!(target.phase, MesocyclePhase::Deload);
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(
            VolumeProgressionCalculator::phase_for_week(4, 6),
            MesocyclePhase::Accumulation
        );
        assert_eq!(
            VolumeProgressionCalculator::phase_for_week(5, 6),
            MesocyclePhase::Intensification
        );
        assert_eq!(
            VolumeProgressionCalculator::phase_for_week(6, 6),
            MesocyclePhase::Deload
        );
    }
}
