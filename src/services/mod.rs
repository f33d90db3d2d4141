// ABOUTME: Service facade over the engine: boundary validation, store policy, orchestrator dispatch
// ABOUTME: The single entry point an API layer or scheduler talks to
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Engine service facade
//!
//! Validates inputs at the boundary, wraps store calls in the timeout and
//! retry policy, and delegates stateful transitions to the orchestrator.
//! Everything here returns [`AppResult`] with the engine's error taxonomy,
//! so callers can map failures to transport status codes mechanically.

use crate::config::EngineConfig;
use crate::engine::fatigue_analyzer::{FatigueAnalysis, FatigueAnalyzer};
use crate::engine::feedback_scorer::FeedbackScorer;
use crate::engine::orchestrator::{MesocycleOrchestrator, UserLocks, WeekAdvanceOutcome};
use crate::engine::volume_progression::{VolumeProgressionCalculator, VolumeTarget};
use crate::engine::{AdjustmentOutcome, AutoAdjustmentTask};
use crate::errors::{AppError, AppResult};
use crate::models::{FeedbackRecord, Mesocycle, WorkoutSession};
use crate::store::{with_store_policy, StoreProvider};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One muscle group's volume target for the active mesocycle's current week
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VolumeRecommendation {
    /// Muscle group the target applies to
    pub muscle_group_id: Uuid,
    /// Computed weekly target
    pub target: VolumeTarget,
    /// Landmark the target was derived from, for context
    pub current_volume: u32,
}

/// Facade bundling the engine's public operations
pub struct EngineService<S: StoreProvider> {
    store: S,
    config: EngineConfig,
    analyzer: FatigueAnalyzer,
    volume: VolumeProgressionCalculator,
    orchestrator: MesocycleOrchestrator<S>,
    adjustment: AutoAdjustmentTask<S>,
}

impl<S: StoreProvider> EngineService<S> {
    /// Build the service over a store provider
    ///
    /// The orchestrator and the auto-adjustment task share one lock map so
    /// their per-user critical sections are mutually exclusive.
    #[must_use]
    pub fn new(store: S, config: EngineConfig) -> Self {
        let locks = Arc::new(UserLocks::new());
        let analyzer = FatigueAnalyzer::new(
            FeedbackScorer::new(config.scoring.clone()),
            config.fatigue.clone(),
        );
        let volume = VolumeProgressionCalculator::new(config.volume.clone());
        let orchestrator =
            MesocycleOrchestrator::new(store.clone(), config.clone(), Arc::clone(&locks));
        let adjustment = AutoAdjustmentTask::new(store.clone(), config.clone(), locks);
        Self {
            store,
            config,
            analyzer,
            volume,
            orchestrator,
            adjustment,
        }
    }

    /// Record a post-workout feedback entry
    ///
    /// Feedback is immutable and one-per-session; a second submission for
    /// the same session is rejected rather than appended.
    ///
    /// # Errors
    /// `InvalidInput`/`ValueOutOfRange` when a rating falls outside 1..=10,
    /// `ResourceAlreadyExists` when the session already has feedback, or a
    /// store error.
    pub async fn submit_feedback(&self, record: &FeedbackRecord) -> AppResult<()> {
        record.validate()?;
        let exists = self
            .call("feedback_exists", || {
                self.store.feedback_exists(record.session_id)
            })
            .await?;
        if exists {
            return Err(AppError::already_exists(format!(
                "feedback for session {}",
                record.session_id
            ))
            .with_user_id(record.user_id));
        }
        self.call("save_feedback", || self.store.save_feedback(record))
            .await?;
        debug!(user_id = %record.user_id, "feedback recorded");
        Ok(())
    }

    /// Current fatigue analysis for a user over the configured window
    ///
    /// # Errors
    /// A store error. An empty feedback history yields the neutral analysis
    /// rather than an error.
    pub async fn get_fatigue_analysis(&self, user_id: Uuid) -> AppResult<FatigueAnalysis> {
        let history = self
            .call("load_feedback_history", || {
                self.store
                    .load_feedback_history(user_id, self.analyzer.window_days())
            })
            .await?;
        Ok(self.analyzer.analyze(&history))
    }

    /// Per-muscle-group volume targets for the active mesocycle's current week
    ///
    /// # Errors
    /// `ResourceNotFound` when the user has no active mesocycle or no
    /// landmarks, or a store error.
    pub async fn get_volume_recommendations(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<VolumeRecommendation>> {
        let mesocycle = self
            .call("load_active_mesocycle", || {
                self.store.load_active_mesocycle(user_id)
            })
            .await?
            .ok_or_else(|| {
                AppError::not_found("active mesocycle").with_user_id(user_id)
            })?;

        let landmarks = self
            .call("load_landmarks", || self.store.load_landmarks(user_id))
            .await?;
        if landmarks.is_empty() {
            return Err(AppError::not_found("volume landmarks").with_user_id(user_id));
        }

        Ok(landmarks
            .iter()
            .map(|landmark| VolumeRecommendation {
                muscle_group_id: landmark.muscle_group_id,
                target: self.volume.calculate(
                    mesocycle.current_week,
                    mesocycle.total_weeks,
                    landmark,
                ),
                current_volume: landmark.current_volume,
            })
            .collect())
    }

    /// Start a new mesocycle
    ///
    /// # Errors
    /// See [`MesocycleOrchestrator::create`].
    pub async fn create_mesocycle(
        &self,
        user_id: Uuid,
        start_date: DateTime<Utc>,
        total_weeks: u32,
    ) -> AppResult<Mesocycle> {
        self.orchestrator.create(user_id, start_date, total_weeks).await
    }

    /// Advance a mesocycle to its next week
    ///
    /// # Errors
    /// See [`MesocycleOrchestrator::advance_week`].
    pub async fn advance_mesocycle_week(
        &self,
        mesocycle_id: Uuid,
    ) -> AppResult<WeekAdvanceOutcome> {
        self.orchestrator.advance_week(mesocycle_id).await
    }

    /// Materialize a mesocycle's first week from a program template
    ///
    /// # Errors
    /// See [`MesocycleOrchestrator::generate_from_template`].
    pub async fn generate_program_from_template(
        &self,
        user_id: Uuid,
        template_id: Uuid,
        mesocycle_id: Uuid,
    ) -> AppResult<Vec<WorkoutSession>> {
        self.orchestrator
            .generate_from_template(user_id, template_id, mesocycle_id)
            .await
    }

    /// Delete a mesocycle and all dependent records
    ///
    /// # Errors
    /// See [`MesocycleOrchestrator::delete_mesocycle`].
    pub async fn delete_mesocycle(&self, mesocycle_id: Uuid) -> AppResult<()> {
        self.orchestrator.delete_mesocycle(mesocycle_id).await
    }

    /// Run the scheduled auto-adjustment pass for one user
    ///
    /// # Errors
    /// See [`AutoAdjustmentTask::run_for_user`].
    pub async fn run_auto_adjustment(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<AdjustmentOutcome> {
        self.adjustment.run_for_user(user_id, now).await
    }

    async fn call<T, F, Fut>(&self, operation: &str, f: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<T>>,
    {
        with_store_policy(&self.config.store, operation, f).await
    }
}
