// ABOUTME: Core domain models for periodized training: landmarks, feedback, mesocycles, sessions
// ABOUTME: Strongly-typed records validated at the system boundary, serializable for transport layers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Common data models for the periodization engine
//!
//! All records are plain serde-serializable values. Primary inputs are
//! validated with explicit errors, never silently clamped; only derived
//! aggregate values are clamped during computation.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive range for subjective feedback ratings and recovery levels
pub const RATING_RANGE: (u8, u8) = (1, 10);

fn check_rating(field: &str, value: u8) -> AppResult<()> {
    if value < RATING_RANGE.0 || value > RATING_RANGE.1 {
        return Err(AppError::out_of_range(field, value, "[1, 10]"));
    }
    Ok(())
}

/// Per-user, per-muscle-group weekly volume landmarks
///
/// MV/MEV/MAV/MRV follow the Israetel volume landmark model: maintenance,
/// minimum effective, maximum adaptive, and maximum recoverable weekly set
/// counts. Owned by the user and mutated weekly by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeLandmark {
    /// Owning user
    pub user_id: Uuid,
    /// Muscle group this landmark describes
    pub muscle_group_id: Uuid,
    /// Maintenance volume (weekly sets)
    pub mv: u32,
    /// Minimum effective volume (weekly sets)
    pub mev: u32,
    /// Maximum adaptive volume (weekly sets)
    pub mav: u32,
    /// Maximum recoverable volume (weekly sets)
    pub mrv: u32,
    /// Sets actually performed in the current week
    pub current_volume: u32,
    /// Prescribed sets for the upcoming week
    pub target_volume: u32,
    /// Subjective recovery level (1-10)
    pub recovery_level: u8,
    /// Subjective adaptation level (1-10)
    pub adaptation_level: u8,
    /// Monotonically increasing version for optimistic writes
    pub version: u64,
}

impl VolumeLandmark {
    /// Validate landmark ordering and level ranges
    ///
    /// # Errors
    /// Returns `InvalidLandmark` when `mev <= mav <= mrv` does not hold and
    /// `ValueOutOfRange` when a recovery or adaptation level leaves [1, 10].
    pub fn validate(&self) -> AppResult<()> {
        if !(self.mev <= self.mav && self.mav <= self.mrv) {
            return Err(AppError::invalid_landmark(format!(
                "landmark for muscle group {} has mev={} mav={} mrv={}",
                self.muscle_group_id, self.mev, self.mav, self.mrv
            )));
        }
        check_rating("recovery_level", self.recovery_level)?;
        check_rating("adaptation_level", self.adaptation_level)?;
        Ok(())
    }
}

/// Post-workout subjective feedback, one record per completed session
///
/// Immutable once created. All five ratings are on the 1-10 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Session the feedback belongs to
    pub session_id: Uuid,
    /// Submitting user
    pub user_id: Uuid,
    /// Muscle pump quality (higher is better)
    pub pump_quality: u8,
    /// Muscle soreness (higher is worse)
    pub muscle_soreness: u8,
    /// Perceived session effort (higher is harder)
    pub perceived_effort: u8,
    /// Energy level going into the session (higher is better)
    pub energy_level: u8,
    /// Sleep quality the night before (higher is better)
    pub sleep_quality: u8,
    /// Submission timestamp
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Validate all five ratings against the 1-10 scale
    ///
    /// # Errors
    /// Returns `ValueOutOfRange` naming the offending field.
    pub fn validate(&self) -> AppResult<()> {
        check_rating("pump_quality", self.pump_quality)?;
        check_rating("muscle_soreness", self.muscle_soreness)?;
        check_rating("perceived_effort", self.perceived_effort)?;
        check_rating("energy_level", self.energy_level)?;
        check_rating("sleep_quality", self.sleep_quality)?;
        Ok(())
    }
}

/// Composite scores derived from a feedback record
///
/// Ephemeral and recomputable; never the source of truth. All values 0-10.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DerivedScores {
    /// Recovery quality composite
    pub recovery_score: f64,
    /// Training adaptation composite
    pub adaptation_score: f64,
    /// Accumulated fatigue composite (higher is worse)
    pub fatigue_score: f64,
    /// Overall training readiness, mean of recovery and adaptation
    pub overall_readiness: f64,
}

/// Training phase within a mesocycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MesocyclePhase {
    /// Volume ramp from MEV toward MAV
    Accumulation,
    /// Peak volume week at or near MAV
    Intensification,
    /// Planned recovery week below MEV
    Deload,
}

/// A multi-week structured training block
///
/// Exactly one active mesocycle per user. Phase transitions are monotonic
/// except for a fatigue-triggered jump straight to deload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesocycle {
    /// Mesocycle ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// First day of week 1
    pub start_date: DateTime<Utc>,
    /// Current week, 1-based
    pub current_week: u32,
    /// Planned length in weeks
    pub total_weeks: u32,
    /// Current training phase
    pub phase: MesocyclePhase,
    /// Whether this block is the user's active mesocycle
    pub is_active: bool,
}

impl Mesocycle {
    /// Derived lifecycle state of this mesocycle
    #[must_use]
    pub const fn state(&self) -> MesocycleState {
        if !self.is_active {
            return MesocycleState::Completed;
        }
        if self.current_week == 0 {
            return MesocycleState::NotStarted;
        }
        MesocycleState::Active {
            week: self.current_week,
            phase: self.phase,
        }
    }
}

/// Lifecycle state of a mesocycle, derived from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum MesocycleState {
    /// Created but week 1 not yet materialized
    NotStarted,
    /// In progress
    Active {
        /// Current week, 1-based
        week: u32,
        /// Current phase
        phase: MesocyclePhase,
    },
    /// Past its final week or deactivated
    Completed,
}

/// A generated training session for one planned training day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Session ID
    pub id: Uuid,
    /// Parent mesocycle
    pub mesocycle_id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Mesocycle week this session belongs to, 1-based
    pub week: u32,
    /// Training day index within the week, 0-based
    pub day_index: u32,
    /// Scheduled calendar date
    pub scheduled_date: DateTime<Utc>,
}

/// A prescribed exercise within a generated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Workout exercise ID
    pub id: Uuid,
    /// Parent session
    pub session_id: Uuid,
    /// Catalog exercise
    pub exercise_id: Uuid,
    /// Prescribed sets for this day
    pub sets: u32,
    /// Prescribed target reps per set
    pub target_reps: u32,
    /// Prescribed load in kilograms, absent until load history exists
    pub weight: Option<f64>,
}

/// How weekly volume is balanced between compound and isolation work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionStrategy {
    /// 60% of sets to the compound pool
    Balanced,
    /// 70% of sets to the compound pool
    CompoundHeavy,
    /// 50/50 split favoring isolation detail work
    IsolationFocus,
    /// 65% compound, tuned for high-frequency splits
    FrequencyOptimized,
}

impl DistributionStrategy {
    /// Fraction of the weekly target assigned to the compound pool
    #[must_use]
    pub const fn compound_ratio(self) -> f64 {
        match self {
            Self::Balanced => 0.6,
            Self::CompoundHeavy => 0.7,
            Self::IsolationFocus => 0.5,
            Self::FrequencyOptimized => 0.65,
        }
    }
}

/// Movement pattern category of a catalog exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    /// Multi-joint movement
    Compound,
    /// Single-joint movement
    Isolation,
}

/// Role of an exercise for one muscle group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleRole {
    /// Muscle group is a primary mover
    Primary,
    /// Muscle group assists
    Secondary,
}

/// Per-muscle-group role and stimulus contribution of an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuscleGroupRole {
    /// Target muscle group
    pub muscle_group_id: Uuid,
    /// Primary or secondary mover
    pub role: MuscleRole,
    /// Share of the exercise's stimulus credited to this group (0-100)
    pub contribution_percent: f64,
}

/// Catalog entry describing an exercise available for allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCatalogEntry {
    /// Exercise ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Compound or isolation
    pub category: ExerciseCategory,
    /// Technical difficulty (1-10)
    pub difficulty: u8,
    /// Muscle groups trained by this exercise
    pub muscle_group_roles: Vec<MuscleGroupRole>,
}

impl ExerciseCatalogEntry {
    /// Role entry for a given muscle group, if this exercise trains it
    #[must_use]
    pub fn role_for(&self, muscle_group_id: Uuid) -> Option<&MuscleGroupRole> {
        self.muscle_group_roles
            .iter()
            .find(|r| r.muscle_group_id == muscle_group_id)
    }
}

/// Per-exercise outcome of weekly volume distribution
///
/// Ephemeral: recomputed each run and never persisted as authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseVolumeAllocation {
    /// Allocated exercise
    pub exercise_id: Uuid,
    /// Total weekly sets assigned to this exercise
    pub allocated_sets: u32,
    /// Training day indices the sets are spread across
    pub training_days: Vec<u32>,
    /// Sets per training day, aligned with `training_days`
    pub sets_per_day: Vec<u32>,
}

/// One week's observed performance and prescription for an exercise
///
/// Consumed by the load progression advisor; first to go in the delete cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProgressionRecord {
    /// Exercise the record describes
    pub exercise_id: Uuid,
    /// Mesocycle week, 1-based
    pub week: u32,
    /// Load used, kilograms
    pub weight: f64,
    /// Reps per set achieved
    pub reps: u32,
    /// Rate of perceived exertion (1-10)
    pub rpe: f64,
    /// Reps in reserve
    pub rir: f64,
}

/// One planned training day inside a program template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDay {
    /// Day index within the week, 0-based
    pub day_index: u32,
    /// Catalog exercises planned for this day
    pub exercise_ids: Vec<Uuid>,
}

/// A reusable program skeleton used to materialize a first training week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramTemplate {
    /// Template ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Planned training days
    pub days: Vec<TemplateDay>,
}
