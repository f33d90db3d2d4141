// ABOUTME: Mesocycle state machine: creation, week advancement, deload overrides, cascade deletion
// ABOUTME: Serializes per-user work, generates sessions idempotently, and writes landmarks optimistically
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Mesocycle orchestration
//!
//! Coordinates the weekly transition: fatigue analysis, per-muscle-group
//! volume targets, set distribution, load prescriptions, and session
//! materialization, in that order. All computation happens before any write,
//! so a failure aborts cleanly with no partial state.
//!
//! Concurrency model: operations for different users are independent; for a
//! single user a lock map serializes advance-week against the scheduled
//! adjustment job. Session generation is idempotent per `(mesocycle, week)`
//! via a check-before-create, and landmark writes carry an optimistic
//! version check.

use crate::config::EngineConfig;
use crate::engine::fatigue_analyzer::{FatigueAnalysis, FatigueAnalyzer};
use crate::engine::feedback_scorer::FeedbackScorer;
use crate::engine::load_progression::{
    ExercisePerformance, LoadProgressionAdvisor, LoadRecommendation,
};
use crate::engine::volume_distribution::{
    ExerciseCandidate, VolumeDistribution, VolumeDistributionAllocator,
};
use crate::engine::volume_progression::{VolumeProgressionCalculator, VolumeTarget};
use crate::errors::{AppError, AppResult};
use crate::models::{
    ExerciseCatalogEntry, Mesocycle, MesocyclePhase, MesocycleState, VolumeLandmark,
    WorkoutExercise, WorkoutSession,
};
use crate::store::{with_store_policy, StoreProvider};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Shortest mesocycle that still has all three phases
const MIN_TOTAL_WEEKS: u32 = 3;

/// Sets prescribed per exercise when a program is first materialized
const TEMPLATE_DEFAULT_SETS: u32 = 3;

/// Target reps prescribed before any load history exists
const DEFAULT_TARGET_REPS: u32 = 10;

/// Per-user async locks serializing mutating engine operations
///
/// Shared between the orchestrator and the scheduled adjustment task so a
/// user-initiated advance and a background adjustment never interleave their
/// read-compute-write cycles.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Create an empty lock map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for one user
    #[must_use]
    pub fn for_user(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// One muscle group's computed target and distribution for the new week
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MuscleGroupPlan {
    /// Muscle group the plan applies to
    pub muscle_group_id: Uuid,
    /// Weekly set target and phase
    pub target: VolumeTarget,
    /// Per-exercise allocation of the target
    pub distribution: VolumeDistribution,
}

/// Per-exercise load prescription produced during week advancement
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoadAdjustment {
    /// Exercise the prescription applies to
    pub exercise_id: Uuid,
    /// Weight/rep recommendation
    pub recommendation: LoadRecommendation,
}

/// Result of advancing a mesocycle by one week
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WeekAdvanceOutcome {
    /// Mesocycle that was advanced
    pub mesocycle_id: Uuid,
    /// The week just entered
    pub new_week: u32,
    /// Phase of the new week, after any fatigue override
    pub phase: MesocyclePhase,
    /// Lifecycle state after the transition
    pub state: MesocycleState,
    /// Fatigue analysis that informed the transition
    pub fatigue: FatigueAnalysis,
    /// Per-muscle-group plans
    pub plans: Vec<MuscleGroupPlan>,
    /// Per-exercise load prescriptions
    pub load_adjustments: Vec<LoadAdjustment>,
    /// Sessions materialized for the new week
    pub sessions: Vec<WorkoutSession>,
}

/// Top-level state machine coordinating weekly transitions
pub struct MesocycleOrchestrator<S: StoreProvider> {
    store: S,
    config: EngineConfig,
    analyzer: FatigueAnalyzer,
    volume: VolumeProgressionCalculator,
    allocator: VolumeDistributionAllocator,
    advisor: LoadProgressionAdvisor,
    locks: Arc<UserLocks>,
}

impl<S: StoreProvider> MesocycleOrchestrator<S> {
    /// Create an orchestrator over a store with the given configuration
    #[must_use]
    pub fn new(store: S, config: EngineConfig, locks: Arc<UserLocks>) -> Self {
        let analyzer = FatigueAnalyzer::new(
            FeedbackScorer::new(config.scoring.clone()),
            config.fatigue.clone(),
        );
        let volume = VolumeProgressionCalculator::new(config.volume.clone());
        let allocator = VolumeDistributionAllocator::new(config.distribution.clone());
        let advisor = LoadProgressionAdvisor::new(config.load.clone());
        Self {
            store,
            config,
            analyzer,
            volume,
            allocator,
            advisor,
            locks,
        }
    }

    /// Start a new mesocycle for a user
    ///
    /// The block begins in week 1, accumulation phase. A user can have at
    /// most one active mesocycle.
    ///
    /// # Errors
    /// `InvalidInput` for a block too short to hold all three phases,
    /// `ResourceAlreadyExists` when an active mesocycle exists, or a store
    /// error.
    pub async fn create(
        &self,
        user_id: Uuid,
        start_date: DateTime<Utc>,
        total_weeks: u32,
    ) -> AppResult<Mesocycle> {
        if total_weeks < MIN_TOTAL_WEEKS {
            return Err(AppError::invalid_input(format!(
                "a mesocycle needs at least {MIN_TOTAL_WEEKS} weeks, got {total_weeks}"
            )));
        }

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let existing = self
            .call("load_active_mesocycle", || {
                self.store.load_active_mesocycle(user_id)
            })
            .await?;
        if let Some(active) = existing {
            return Err(AppError::already_exists(format!(
                "active mesocycle {} for user {user_id}",
                active.id
            )));
        }

        let mesocycle = Mesocycle {
            id: Uuid::new_v4(),
            user_id,
            start_date,
            current_week: 1,
            total_weeks,
            phase: MesocyclePhase::Accumulation,
            is_active: true,
        };
        self.call("create_mesocycle", || {
            self.store.create_mesocycle(&mesocycle)
        })
        .await?;

        info!(mesocycle_id = %mesocycle.id, %user_id, total_weeks, "mesocycle created");
        Ok(mesocycle)
    }

    /// Advance a mesocycle to its next week
    ///
    /// Runs the full weekly pipeline: fatigue analysis, volume targets per
    /// muscle group, set distribution, load prescriptions, session
    /// materialization, then landmark persistence. A fatigue-triggered
    /// deload overrides the week-derived phase.
    ///
    /// Sessions left behind by an interrupted advance are replaced, so the
    /// call is safe to retry until the week bump is persisted.
    ///
    /// # Errors
    /// `ResourceNotFound` for a missing mesocycle, landmarks, or prior-week
    /// sessions; `ConcurrentModification` when a landmark version check
    /// fails; store errors otherwise.
    pub async fn advance_week(&self, mesocycle_id: Uuid) -> AppResult<WeekAdvanceOutcome> {
        let mut mesocycle = self.require_mesocycle(mesocycle_id).await?;
        if !mesocycle.is_active {
            return Err(AppError::invalid_input(format!(
                "mesocycle {mesocycle_id} is not active"
            )));
        }

        let lock = self.locks.for_user(mesocycle.user_id);
        let _guard = lock.lock().await;

        let new_week = mesocycle.current_week + 1;
        if new_week > mesocycle.total_weeks {
            return self.complete(mesocycle).await;
        }

        // Sessions for the new week can only exist if a prior advance was
        // interrupted after its session write; current_week was never bumped,
        // so they are leftovers. Replace them and let the retry complete.
        let existing = self
            .call("list_sessions", || {
                self.store.list_sessions(mesocycle_id, new_week)
            })
            .await?;
        if !existing.is_empty() {
            warn!(
                mesocycle_id = %mesocycle_id,
                week = new_week,
                leftover_sessions = existing.len(),
                "replacing sessions left by an interrupted week advance"
            );
            self.call("delete_week_sessions", || {
                self.store.delete_week_sessions(mesocycle_id, new_week)
            })
            .await?;
        }

        // (a) Fatigue analysis over the feedback window.
        let history = self
            .call("load_feedback_history", || {
                self.store
                    .load_feedback_history(mesocycle.user_id, self.analyzer.window_days())
            })
            .await?;
        let fatigue = self.analyzer.analyze(&history);

        let landmarks = self
            .call("load_landmarks", || {
                self.store.load_landmarks(mesocycle.user_id)
            })
            .await?;
        if landmarks.is_empty() {
            return Err(
                AppError::not_found("volume landmarks").with_user_id(mesocycle.user_id)
            );
        }

        // Prior week's structure drives the new week's days and exercises.
        let (day_indices, exercise_ids) = self
            .prior_week_structure(mesocycle_id, mesocycle.current_week)
            .await?;
        let catalog = self
            .call("load_exercise_catalog", || {
                self.store.load_exercise_catalog(&exercise_ids)
            })
            .await?;

        let forced_deload = fatigue.deload_recommended;
        if forced_deload {
            warn!(
                mesocycle_id = %mesocycle_id,
                reasons = ?fatigue.reasons,
                "fatigue-triggered deload overrides week {new_week} phase"
            );
        }
        let phase = if forced_deload {
            MesocyclePhase::Deload
        } else {
            VolumeProgressionCalculator::phase_for_week(new_week, mesocycle.total_weeks)
        };

        // (b) + (c) Volume target and distribution per muscle group.
        let plans = self.plan_muscle_groups(
            &landmarks,
            new_week,
            mesocycle.total_weeks,
            forced_deload,
            &catalog,
            &day_indices,
        );

        // (d) Load prescriptions from the prior week's completed performance.
        let load_adjustments = self
            .advise_loads(mesocycle_id, &exercise_ids, &catalog)
            .await?;

        // (e) Materialize the new week. All computation is done; writes start here.
        let sessions = build_sessions(&mesocycle, new_week, &day_indices);
        let exercises = build_workout_exercises(&sessions, &plans, &load_adjustments);
        self.call("create_workout_sessions", || {
            self.store.create_workout_sessions(&sessions)
        })
        .await?;
        self.call("create_workout_exercises", || {
            self.store.create_workout_exercises(&exercises)
        })
        .await?;

        // (f) Persist updated landmarks under the optimistic version check.
        for (landmark, plan) in landmarks.iter().zip(&plans) {
            let mut updated = landmark.clone();
            updated.current_volume = landmark.target_volume;
            updated.target_volume = plan.target.target_sets;
            let written = self
                .call("save_landmark", || self.store.save_landmark(&updated))
                .await?;
            if !written {
                return Err(AppError::concurrent_modification(format!(
                    "landmark for muscle group {} changed during week advance",
                    landmark.muscle_group_id
                )));
            }
        }

        mesocycle.current_week = new_week;
        mesocycle.phase = phase;
        self.call("save_mesocycle", || self.store.save_mesocycle(&mesocycle))
            .await?;

        info!(
            mesocycle_id = %mesocycle_id,
            new_week,
            ?phase,
            sessions = sessions.len(),
            "mesocycle advanced"
        );

        Ok(WeekAdvanceOutcome {
            mesocycle_id,
            new_week,
            phase,
            state: mesocycle.state(),
            fatigue,
            plans,
            load_adjustments,
            sessions,
        })
    }

    /// Materialize week-1 sessions from a program template
    ///
    /// Idempotent per mesocycle: repeated calls do not duplicate sessions.
    /// Exercises start with a conservative default prescription until load
    /// history accrues.
    ///
    /// # Errors
    /// `ResourceNotFound` for a missing mesocycle or template,
    /// `InvalidInput` when the mesocycle belongs to another user,
    /// `DuplicateGeneration` when week 1 was already materialized.
    pub async fn generate_from_template(
        &self,
        user_id: Uuid,
        template_id: Uuid,
        mesocycle_id: Uuid,
    ) -> AppResult<Vec<WorkoutSession>> {
        let mesocycle = self.require_mesocycle(mesocycle_id).await?;
        if mesocycle.user_id != user_id {
            return Err(AppError::invalid_input(format!(
                "mesocycle {mesocycle_id} does not belong to user {user_id}"
            )));
        }

        let template = self
            .call("load_program_template", || {
                self.store.load_program_template(template_id)
            })
            .await?
            .ok_or_else(|| AppError::not_found(format!("program template {template_id}")))?;

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let existing = self
            .call("list_sessions", || self.store.list_sessions(mesocycle_id, 1))
            .await?;
        if !existing.is_empty() {
            return Err(AppError::duplicate_generation(mesocycle_id, 1));
        }

        let mut sessions = Vec::with_capacity(template.days.len());
        let mut exercises = Vec::new();
        for day in &template.days {
            let session = WorkoutSession {
                id: Uuid::new_v4(),
                mesocycle_id,
                user_id,
                week: 1,
                day_index: day.day_index,
                scheduled_date: mesocycle.start_date + Duration::days(i64::from(day.day_index)),
            };
            for exercise_id in &day.exercise_ids {
                exercises.push(WorkoutExercise {
                    id: Uuid::new_v4(),
                    session_id: session.id,
                    exercise_id: *exercise_id,
                    sets: TEMPLATE_DEFAULT_SETS,
                    target_reps: DEFAULT_TARGET_REPS,
                    weight: None,
                });
            }
            sessions.push(session);
        }

        self.call("create_workout_sessions", || {
            self.store.create_workout_sessions(&sessions)
        })
        .await?;
        self.call("create_workout_exercises", || {
            self.store.create_workout_exercises(&exercises)
        })
        .await?;

        info!(
            mesocycle_id = %mesocycle_id,
            template_id = %template_id,
            sessions = sessions.len(),
            "program materialized from template"
        );
        Ok(sessions)
    }

    /// Delete a mesocycle and everything hanging off it
    ///
    /// Cascade order is strict: load-progression records, then workout
    /// exercises, then feedback records, then sessions, then the mesocycle.
    ///
    /// # Errors
    /// `ResourceNotFound` for a missing mesocycle, or a store error.
    pub async fn delete_mesocycle(&self, mesocycle_id: Uuid) -> AppResult<()> {
        let mesocycle = self.require_mesocycle(mesocycle_id).await?;

        let lock = self.locks.for_user(mesocycle.user_id);
        let _guard = lock.lock().await;

        self.call("delete_load_progression", || {
            self.store.delete_load_progression(mesocycle_id)
        })
        .await?;
        self.call("delete_workout_exercises", || {
            self.store.delete_workout_exercises(mesocycle_id)
        })
        .await?;
        self.call("delete_feedback_records", || {
            self.store.delete_feedback_records(mesocycle_id)
        })
        .await?;
        self.call("delete_workout_sessions", || {
            self.store.delete_workout_sessions(mesocycle_id)
        })
        .await?;
        self.call("delete_mesocycle", || {
            self.store.delete_mesocycle(mesocycle_id)
        })
        .await?;

        info!(mesocycle_id = %mesocycle_id, "mesocycle deleted with full cascade");
        Ok(())
    }

    async fn complete(&self, mut mesocycle: Mesocycle) -> AppResult<WeekAdvanceOutcome> {
        mesocycle.is_active = false;
        self.call("save_mesocycle", || self.store.save_mesocycle(&mesocycle))
            .await?;
        info!(mesocycle_id = %mesocycle.id, "mesocycle completed");

        Ok(WeekAdvanceOutcome {
            mesocycle_id: mesocycle.id,
            new_week: mesocycle.current_week,
            phase: mesocycle.phase,
            state: MesocycleState::Completed,
            fatigue: FatigueAnalysis::neutral(&self.config.fatigue),
            plans: Vec::new(),
            load_adjustments: Vec::new(),
            sessions: Vec::new(),
        })
    }

    async fn require_mesocycle(&self, mesocycle_id: Uuid) -> AppResult<Mesocycle> {
        self.call("get_mesocycle", || self.store.get_mesocycle(mesocycle_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("mesocycle {mesocycle_id}")))
    }

    /// Day indices and distinct exercises of the prior week's sessions
    async fn prior_week_structure(
        &self,
        mesocycle_id: Uuid,
        week: u32,
    ) -> AppResult<(Vec<u32>, Vec<Uuid>)> {
        let sessions = self
            .call("list_sessions", || {
                self.store.list_sessions(mesocycle_id, week)
            })
            .await?;
        if sessions.is_empty() {
            return Err(AppError::not_found(format!(
                "workout sessions for mesocycle {mesocycle_id} week {week}"
            )));
        }

        let mut days: Vec<u32> = sessions.iter().map(|s| s.day_index).collect();
        days.sort_unstable();
        days.dedup();

        let mut exercise_ids = BTreeSet::new();
        for session in &sessions {
            let exercises = self
                .call("list_session_exercises", || {
                    self.store.list_session_exercises(session.id)
                })
                .await?;
            exercise_ids.extend(exercises.iter().map(|e| e.exercise_id));
        }

        Ok((days, exercise_ids.into_iter().collect()))
    }

    fn plan_muscle_groups(
        &self,
        landmarks: &[VolumeLandmark],
        new_week: u32,
        total_weeks: u32,
        forced_deload: bool,
        catalog: &[ExerciseCatalogEntry],
        day_indices: &[u32],
    ) -> Vec<MuscleGroupPlan> {
        landmarks
            .iter()
            .map(|landmark| {
                let target = if forced_deload {
                    // A forced deload prescribes the final-week volume
                    // regardless of the calendar position.
                    self.volume.calculate(total_weeks, total_weeks, landmark)
                } else {
                    self.volume.calculate(new_week, total_weeks, landmark)
                };

                let candidates: Vec<ExerciseCandidate> = catalog
                    .iter()
                    .filter_map(|entry| {
                        ExerciseCandidate::from_catalog(entry, landmark.muscle_group_id)
                    })
                    .collect();
                let distribution = self.allocator.distribute(
                    target.target_sets,
                    &candidates,
                    day_indices,
                    self.config.distribution.strategy,
                );

                debug!(
                    muscle_group = %landmark.muscle_group_id,
                    target_sets = target.target_sets,
                    allocated = distribution.total_allocated,
                    "muscle group planned"
                );
                MuscleGroupPlan {
                    muscle_group_id: landmark.muscle_group_id,
                    target,
                    distribution,
                }
            })
            .collect()
    }

    async fn advise_loads(
        &self,
        mesocycle_id: Uuid,
        exercise_ids: &[Uuid],
        catalog: &[ExerciseCatalogEntry],
    ) -> AppResult<Vec<LoadAdjustment>> {
        let mut adjustments = Vec::new();
        for exercise_id in exercise_ids {
            let history = self
                .call("load_load_progression", || {
                    self.store.load_load_progression(mesocycle_id, *exercise_id)
                })
                .await?;
            let Some(last) = history.last() else {
                continue; // no completed performance yet, keep the default prescription
            };
            let Some(entry) = catalog.iter().find(|e| e.id == *exercise_id) else {
                continue;
            };
            let performance = ExercisePerformance {
                exercise_id: *exercise_id,
                category: entry.category,
                weight: last.weight,
                reps: last.reps,
                rpe: last.rpe,
                rir: last.rir,
            };
            adjustments.push(LoadAdjustment {
                exercise_id: *exercise_id,
                recommendation: self.advisor.recommend(&performance, &history),
            });
        }
        Ok(adjustments)
    }

    async fn call<T, F, Fut>(&self, operation: &str, f: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<T>>,
    {
        with_store_policy(&self.config.store, operation, f).await
    }
}

fn build_sessions(
    mesocycle: &Mesocycle,
    new_week: u32,
    day_indices: &[u32],
) -> Vec<WorkoutSession> {
    day_indices
        .iter()
        .map(|&day_index| WorkoutSession {
            id: Uuid::new_v4(),
            mesocycle_id: mesocycle.id,
            user_id: mesocycle.user_id,
            week: new_week,
            day_index,
            scheduled_date: mesocycle.start_date
                + Duration::weeks(i64::from(new_week - 1))
                + Duration::days(i64::from(day_index)),
        })
        .collect()
}

/// Turn per-muscle-group plans into concrete workout exercise rows
///
/// An exercise credited to several muscle groups keeps its largest per-day
/// allocation rather than the sum, so multi-role movements are not double
/// counted.
fn build_workout_exercises(
    sessions: &[WorkoutSession],
    plans: &[MuscleGroupPlan],
    load_adjustments: &[LoadAdjustment],
) -> Vec<WorkoutExercise> {
    // (day_index, exercise_id) -> sets
    let mut per_day: BTreeMap<(u32, Uuid), u32> = BTreeMap::new();
    for plan in plans {
        for allocation in &plan.distribution.allocations {
            for (day, sets) in allocation
                .training_days
                .iter()
                .zip(&allocation.sets_per_day)
            {
                let slot = per_day.entry((*day, allocation.exercise_id)).or_default();
                *slot = (*slot).max(*sets);
            }
        }
    }

    let mut exercises = Vec::with_capacity(per_day.len());
    for ((day_index, exercise_id), sets) in per_day {
        if sets == 0 {
            continue;
        }
        let Some(session) = sessions.iter().find(|s| s.day_index == day_index) else {
            continue;
        };
        let adjustment = load_adjustments
            .iter()
            .find(|a| a.exercise_id == exercise_id);
        exercises.push(WorkoutExercise {
            id: Uuid::new_v4(),
            session_id: session.id,
            exercise_id,
            sets,
            target_reps: adjustment
                .map_or(DEFAULT_TARGET_REPS, |a| a.recommendation.recommended_reps),
            weight: adjustment.map(|a| a.recommendation.recommended_weight),
        });
    }
    exercises
}
