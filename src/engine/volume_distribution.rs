// ABOUTME: Spreads a muscle group's weekly set target across exercises and training days
// ABOUTME: Priority-scored allocation with strategy pool ratios, per-exercise caps, and warnings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Volume distribution
//!
//! Turns one muscle group's weekly set target into per-exercise, per-day set
//! counts. Candidates are priority-scored, split into compound and isolation
//! pools by the strategy ratio, guaranteed at least one set each, then topped
//! up in priority order under a dynamic cap. Day spreading is even with the
//! remainder going to the earliest days.
//!
//! The allocator is deterministic and idempotent: the same inputs always
//! produce the same allocation, and set counts are never negative.

use crate::config::DistributionConfig;
use crate::models::{
    ExerciseCategory, ExerciseCatalogEntry, ExerciseVolumeAllocation, MuscleRole,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::models::DistributionStrategy;

/// An exercise candidate for one muscle group's weekly allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCandidate {
    /// Catalog exercise
    pub exercise_id: Uuid,
    /// Compound or isolation
    pub category: ExerciseCategory,
    /// Technical difficulty (1-10)
    pub difficulty: u8,
    /// Primary or secondary mover for the muscle group
    pub role: MuscleRole,
    /// Share of the exercise's stimulus credited to this group (0-100)
    pub contribution_percent: f64,
}

impl ExerciseCandidate {
    /// Build a candidate from a catalog entry, if it trains the muscle group
    #[must_use]
    pub fn from_catalog(entry: &ExerciseCatalogEntry, muscle_group_id: Uuid) -> Option<Self> {
        entry.role_for(muscle_group_id).map(|role| Self {
            exercise_id: entry.id,
            category: entry.category,
            difficulty: entry.difficulty,
            role: role.role,
            contribution_percent: role.contribution_percent,
        })
    }

    /// Priority score in [1, 10] driving allocation order
    ///
    /// Base 5, +3 compound / +1 isolation, + difficulty/2, +2 primary /
    /// +1 secondary, plus a small contribution-percentage nudge.
    #[must_use]
    pub fn priority_score(&self) -> f64 {
        let category_bonus = match self.category {
            ExerciseCategory::Compound => 3.0,
            ExerciseCategory::Isolation => 1.0,
        };
        let role_bonus = match self.role {
            MuscleRole::Primary => 2.0,
            MuscleRole::Secondary => 1.0,
        };
        let score = 5.0
            + category_bonus
            + f64::from(self.difficulty) / 2.0
            + role_bonus
            + self.contribution_percent / 100.0;
        score.clamp(1.0, 10.0)
    }
}

/// Result of distributing one muscle group's weekly volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeDistribution {
    /// Per-exercise allocations, highest priority first
    pub allocations: Vec<ExerciseVolumeAllocation>,
    /// Total sets actually allocated
    pub total_allocated: u32,
    /// Quality warnings for the caller to surface
    pub warnings: Vec<String>,
}

/// Allocator spreading weekly set targets across exercises and days
pub struct VolumeDistributionAllocator {
    config: DistributionConfig,
}

impl Default for VolumeDistributionAllocator {
    fn default() -> Self {
        Self::new(DistributionConfig::default())
    }
}

impl VolumeDistributionAllocator {
    /// Create an allocator with the given caps
    #[must_use]
    pub const fn new(config: DistributionConfig) -> Self {
        Self { config }
    }

    /// Distribute a weekly set target across candidates and training days
    #[must_use]
    pub fn distribute(
        &self,
        weekly_target_sets: u32,
        candidates: &[ExerciseCandidate],
        training_days: &[u32],
        strategy: DistributionStrategy,
    ) -> VolumeDistribution {
        let mut warnings = Vec::new();

        if candidates.is_empty() {
            warnings.push("No candidate exercises for this muscle group".to_owned());
            return VolumeDistribution {
                allocations: Vec::new(),
                total_allocated: 0,
                warnings,
            };
        }

        let mut compounds: Vec<&ExerciseCandidate> = candidates
            .iter()
            .filter(|c| c.category == ExerciseCategory::Compound)
            .collect();
        let mut isolations: Vec<&ExerciseCandidate> = candidates
            .iter()
            .filter(|c| c.category == ExerciseCategory::Isolation)
            .collect();
        sort_by_priority(&mut compounds);
        sort_by_priority(&mut isolations);

        let (compound_sets, isolation_sets) =
            split_pools(weekly_target_sets, strategy, compounds.len(), isolations.len());

        let mut allocations = Vec::with_capacity(candidates.len());
        allocations.extend(self.allocate_pool(compound_sets, &compounds, training_days));
        allocations.extend(self.allocate_pool(isolation_sets, &isolations, training_days));

        let total_allocated: u32 = allocations.iter().map(|a| a.allocated_sets).sum();

        let deviation = total_allocated.abs_diff(weekly_target_sets);
        if deviation > self.config.target_deviation_warn {
            warnings.push(format!(
                "Allocated {total_allocated} sets against a target of {weekly_target_sets}"
            ));
        }
        for allocation in &allocations {
            if allocation.allocated_sets == 0 {
                warnings.push(format!(
                    "Exercise {} received no sets this week",
                    allocation.exercise_id
                ));
            } else if allocation.allocated_sets > self.config.per_exercise_warn_threshold {
                warnings.push(format!(
                    "Exercise {} carries {} weekly sets, above the {}-set guideline",
                    allocation.exercise_id,
                    allocation.allocated_sets,
                    self.config.per_exercise_warn_threshold
                ));
            }
        }

        VolumeDistribution {
            allocations,
            total_allocated,
            warnings,
        }
    }

    /// Allocate one pool's sets: a one-set guarantee, then priority top-up
    fn allocate_pool(
        &self,
        pool_sets: u32,
        ranked: &[&ExerciseCandidate],
        training_days: &[u32],
    ) -> Vec<ExerciseVolumeAllocation> {
        if ranked.is_empty() {
            return Vec::new();
        }

        let count = ranked.len() as u32;
        let even_share_cap = pool_sets.div_ceil(count) + self.config.cap_margin;
        let cap = even_share_cap.min(self.config.max_sets_per_exercise);

        let mut sets = vec![0u32; ranked.len()];
        let mut remaining = pool_sets;

        // Guarantee every exercise one set while sets remain.
        for s in &mut sets {
            if remaining == 0 {
                break;
            }
            *s = 1;
            remaining -= 1;
        }

        // Top up in priority order under the cap.
        while remaining > 0 {
            let mut placed = false;
            for s in &mut sets {
                if remaining == 0 {
                    break;
                }
                if *s < cap {
                    *s += 1;
                    remaining -= 1;
                    placed = true;
                }
            }
            if !placed {
                break; // every exercise is at its cap
            }
        }

        ranked
            .iter()
            .zip(sets)
            .map(|(candidate, allocated)| {
                spread_across_days(candidate.exercise_id, allocated, training_days)
            })
            .collect()
    }
}

fn sort_by_priority(candidates: &mut [&ExerciseCandidate]) {
    candidates.sort_by(|a, b| {
        b.priority_score()
            .partial_cmp(&a.priority_score())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });
}

/// Split the weekly target between pools; an empty pool forfeits its share
fn split_pools(
    total: u32,
    strategy: DistributionStrategy,
    compound_count: usize,
    isolation_count: usize,
) -> (u32, u32) {
    match (compound_count, isolation_count) {
        (0, _) => (0, total),
        (_, 0) => (total, 0),
        _ => {
            let compound = (f64::from(total) * strategy.compound_ratio()).round() as u32;
            let compound = compound.min(total);
            (compound, total - compound)
        }
    }
}

/// Spread an exercise's sets evenly across days, remainder to earliest days
fn spread_across_days(
    exercise_id: Uuid,
    allocated_sets: u32,
    training_days: &[u32],
) -> ExerciseVolumeAllocation {
    if allocated_sets == 0 || training_days.is_empty() {
        return ExerciseVolumeAllocation {
            exercise_id,
            allocated_sets,
            training_days: Vec::new(),
            sets_per_day: Vec::new(),
        };
    }

    let day_count = (training_days.len() as u32).min(allocated_sets) as usize;
    let days: Vec<u32> = training_days[..day_count].to_vec();

    let base = allocated_sets / day_count as u32;
    let remainder = allocated_sets % day_count as u32;
    let sets_per_day: Vec<u32> = (0..day_count as u32)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect();

    ExerciseVolumeAllocation {
        exercise_id,
        allocated_sets,
        training_days: days,
        sets_per_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(
        category: ExerciseCategory,
        difficulty: u8,
        role: MuscleRole,
        contribution: f64,
    ) -> ExerciseCandidate {
        ExerciseCandidate {
            exercise_id: Uuid::new_v4(),
            category,
            difficulty,
            role,
            contribution_percent: contribution,
        }
    }

    fn typical_candidates() -> Vec<ExerciseCandidate> {
        vec![
            candidate(ExerciseCategory::Compound, 7, MuscleRole::Primary, 70.0),
            candidate(ExerciseCategory::Compound, 5, MuscleRole::Secondary, 40.0),
            candidate(ExerciseCategory::Isolation, 3, MuscleRole::Primary, 90.0),
            candidate(ExerciseCategory::Isolation, 2, MuscleRole::Primary, 80.0),
        ]
    }

    #[test]
    fn test_allocated_total_matches_target() {
        let allocator = VolumeDistributionAllocator::default();
        let candidates = typical_candidates();
        for strategy in [
            DistributionStrategy::Balanced,
            DistributionStrategy::CompoundHeavy,
            DistributionStrategy::IsolationFocus,
            DistributionStrategy::FrequencyOptimized,
        ] {
            for target in [4, 10, 16, 20] {
                let result = allocator.distribute(target, &candidates, &[0, 2, 4], strategy);
                assert!(
                    result.total_allocated.abs_diff(target) <= 1,
                    "{strategy:?} target {target} allocated {}",
                    result.total_allocated
                );
            }
        }
    }

    #[test]
    fn test_priority_score_clamped() {
        let max = candidate(ExerciseCategory::Compound, 10, MuscleRole::Primary, 100.0);
        assert!((max.priority_score() - 10.0).abs() < f64::EPSILON);

        let min = candidate(ExerciseCategory::Isolation, 1, MuscleRole::Secondary, 0.0);
        assert!(min.priority_score() >= 1.0);
    }

    #[test]
    fn test_empty_compound_pool_gets_reassigned() {
        let allocator = VolumeDistributionAllocator::default();
        let candidates = vec![
            candidate(ExerciseCategory::Isolation, 3, MuscleRole::Primary, 90.0),
            candidate(ExerciseCategory::Isolation, 2, MuscleRole::Primary, 70.0),
        ];
        let result = allocator.distribute(
            10,
            &candidates,
            &[0, 3],
            DistributionStrategy::CompoundHeavy,
        );
        assert_eq!(result.total_allocated, 10);
    }

    #[test]
    fn test_every_exercise_gets_a_set_when_volume_allows() {
        let allocator = VolumeDistributionAllocator::default();
        let result = allocator.distribute(
            12,
            &typical_candidates(),
            &[0, 2, 4],
            DistributionStrategy::Balanced,
        );
        assert!(result.allocations.iter().all(|a| a.allocated_sets >= 1));
    }

    #[test]
    fn test_day_spread_even_with_remainder_to_earliest() {
        let allocation = spread_across_days(Uuid::new_v4(), 7, &[1, 3, 5]);
        assert_eq!(allocation.sets_per_day, vec![3, 2, 2]);
        assert_eq!(allocation.training_days, vec![1, 3, 5]);
    }

    #[test]
    fn test_fewer_sets_than_days_uses_earliest_days() {
        let allocation = spread_across_days(Uuid::new_v4(), 2, &[0, 2, 4]);
        assert_eq!(allocation.training_days, vec![0, 2]);
        assert_eq!(allocation.sets_per_day, vec![1, 1]);
    }

    #[test]
    fn test_idempotent_for_same_input() {
        let allocator = VolumeDistributionAllocator::default();
        let candidates = typical_candidates();
        let a = allocator.distribute(14, &candidates, &[0, 2, 4], DistributionStrategy::Balanced);
        let b = allocator.distribute(14, &candidates, &[0, 2, 4], DistributionStrategy::Balanced);
        assert_eq!(a.allocations, b.allocations);
    }

    #[test]
    fn test_overloaded_exercise_warns() {
        let allocator = VolumeDistributionAllocator::default();
        let candidates = vec![candidate(
            ExerciseCategory::Compound,
            7,
            MuscleRole::Primary,
            80.0,
        )];
        let result = allocator.distribute(8, &candidates, &[0, 2], DistributionStrategy::Balanced);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("above the 6-set guideline")));
    }

    #[test]
    fn test_cap_limits_single_exercise_and_warns_deviation() {
        let allocator = VolumeDistributionAllocator::default();
        let candidates = vec![candidate(
            ExerciseCategory::Compound,
            7,
            MuscleRole::Primary,
            80.0,
        )];
        // Hard cap of 8 leaves 4 unallocated.
        let result = allocator.distribute(12, &candidates, &[0, 2], DistributionStrategy::Balanced);
        assert_eq!(result.total_allocated, 8);
        assert!(result.warnings.iter().any(|w| w.contains("target of 12")));
    }

    #[test]
    fn test_no_candidates_warns() {
        let allocator = VolumeDistributionAllocator::default();
        let result = allocator.distribute(10, &[], &[0, 2], DistributionStrategy::Balanced);
        assert!(result.allocations.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_zero_target_allocates_nothing() {
        let allocator = VolumeDistributionAllocator::default();
        let result = allocator.distribute(
            0,
            &typical_candidates(),
            &[0, 2],
            DistributionStrategy::Balanced,
        );
        assert_eq!(result.total_allocated, 0);
    }
}
