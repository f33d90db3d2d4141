// ABOUTME: Store abstraction for the periodization engine's persistence boundary
// ABOUTME: Plugin architecture so SQL backends and the in-memory store share one interface
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Store abstraction layer
//!
//! The engine reads and writes landmarks, feedback, mesocycles, sessions, and
//! load history through [`StoreProvider`]. Implementations own the actual
//! persistence mechanics; the engine owns the call policy (deadline, one
//! retry with backoff) and treats read-compute-write per user and muscle
//! group as one logical transaction via optimistic landmark versions.

use crate::config::StoreConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ExerciseCatalogEntry, FeedbackRecord, LoadProgressionRecord, Mesocycle, ProgramTemplate,
    VolumeLandmark, WorkoutExercise, WorkoutSession,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::warn;
use uuid::Uuid;

pub mod memory;

pub use memory::MemoryStore;

/// Run a store call under the engine's call policy
///
/// Applies the configured per-call deadline and retries exactly once after a
/// backoff. Failures surface as `StoreUnavailable` or `StoreTimeout`; the
/// caller must not have performed any partial writes before invoking this.
///
/// # Errors
/// Returns `AppError` when both the call and its single retry fail.
pub async fn with_store_policy<T, F, Fut>(
    config: &StoreConfig,
    operation: &str,
    call: F,
) -> AppResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(config.call_timeout(), call()).await {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(error)) => warn!(operation, %error, "store call failed, retrying once"),
        Err(_) => warn!(operation, "store call timed out, retrying once"),
    }

    tokio::time::sleep(config.retry_backoff()).await;

    match tokio::time::timeout(config.call_timeout(), call()).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(AppError::from(error)),
        Err(_) => Err(AppError::store_timeout(operation)),
    }
}

/// Core store abstraction trait
///
/// All store implementations must implement this trait to provide a
/// consistent interface for the engine layer.
#[async_trait]
pub trait StoreProvider: Send + Sync + Clone {
    // ================================
    // Volume Landmarks
    // ================================

    /// Get all volume landmarks tracked for a user
    async fn load_landmarks(&self, user_id: Uuid) -> Result<Vec<VolumeLandmark>>;

    /// Write a landmark under an optimistic version check
    ///
    /// The landmark's `version` field names the version the caller read.
    /// Returns `Ok(false)` without writing when the stored version differs.
    async fn save_landmark(&self, landmark: &VolumeLandmark) -> Result<bool>;

    // ================================
    // Feedback
    // ================================

    /// Persist an immutable post-session feedback record
    async fn save_feedback(&self, record: &FeedbackRecord) -> Result<()>;

    /// Whether a feedback record already exists for the session
    async fn feedback_exists(&self, session_id: Uuid) -> Result<bool>;

    /// Get a user's feedback records within the trailing window, oldest first
    async fn load_feedback_history(
        &self,
        user_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<FeedbackRecord>>;

    // ================================
    // Mesocycles
    // ================================

    /// Get a user's active mesocycle, if any
    async fn load_active_mesocycle(&self, user_id: Uuid) -> Result<Option<Mesocycle>>;

    /// Get a mesocycle by ID
    async fn get_mesocycle(&self, mesocycle_id: Uuid) -> Result<Option<Mesocycle>>;

    /// Create a new mesocycle
    async fn create_mesocycle(&self, mesocycle: &Mesocycle) -> Result<()>;

    /// Update an existing mesocycle
    async fn save_mesocycle(&self, mesocycle: &Mesocycle) -> Result<()>;

    /// Delete a mesocycle row (cascade deletes run first, see orchestrator)
    async fn delete_mesocycle(&self, mesocycle_id: Uuid) -> Result<()>;

    // ================================
    // Exercise Catalog & Templates
    // ================================

    /// Resolve catalog entries for the given exercise IDs
    async fn load_exercise_catalog(
        &self,
        exercise_ids: &[Uuid],
    ) -> Result<Vec<ExerciseCatalogEntry>>;

    /// Get a program template by ID
    async fn load_program_template(&self, template_id: Uuid) -> Result<Option<ProgramTemplate>>;

    // ================================
    // Sessions & Workout Exercises
    // ================================

    /// List the generated sessions for one mesocycle week
    async fn list_sessions(&self, mesocycle_id: Uuid, week: u32) -> Result<Vec<WorkoutSession>>;

    /// List prescribed exercises for a session
    async fn list_session_exercises(&self, session_id: Uuid) -> Result<Vec<WorkoutExercise>>;

    /// Create a week's generated sessions as one batch
    async fn create_workout_sessions(&self, sessions: &[WorkoutSession]) -> Result<()>;

    /// Create prescribed exercises for generated sessions
    async fn create_workout_exercises(&self, exercises: &[WorkoutExercise]) -> Result<()>;

    /// Delete one week's sessions and their prescribed exercises
    async fn delete_week_sessions(&self, mesocycle_id: Uuid, week: u32) -> Result<()>;

    /// Delete all workout exercises belonging to a mesocycle
    async fn delete_workout_exercises(&self, mesocycle_id: Uuid) -> Result<()>;

    /// Delete all feedback records attached to a mesocycle's sessions
    async fn delete_feedback_records(&self, mesocycle_id: Uuid) -> Result<()>;

    /// Delete all sessions belonging to a mesocycle
    async fn delete_workout_sessions(&self, mesocycle_id: Uuid) -> Result<()>;

    // ================================
    // Load Progression History
    // ================================

    /// Get an exercise's load history within a mesocycle, oldest week first
    async fn load_load_progression(
        &self,
        mesocycle_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<Vec<LoadProgressionRecord>>;

    /// Append load progression records for a mesocycle
    async fn append_load_progression(
        &self,
        mesocycle_id: Uuid,
        records: &[LoadProgressionRecord],
    ) -> Result<()>;

    /// Delete all load progression records belonging to a mesocycle
    async fn delete_load_progression(&self, mesocycle_id: Uuid) -> Result<()>;

    // ================================
    // Auto-Adjustment Bookkeeping
    // ================================

    /// When the scheduled adjustment task last ran for a user
    async fn load_last_adjustment(&self, user_id: Uuid) -> Result<Option<DateTime<Utc>>>;

    /// Record an adjustment run for a user
    async fn save_last_adjustment(&self, user_id: Uuid, ran_at: DateTime<Utc>) -> Result<()>;
}
