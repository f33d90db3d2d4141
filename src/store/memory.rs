// ABOUTME: In-process store backend over tokio RwLock-guarded maps
// ABOUTME: Used by integration tests and embedders that run the engine without a database
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! In-memory store backend
//!
//! Reference implementation of [`StoreProvider`]. Not durable; a restart
//! loses all state. Version semantics match the SQL backends: a landmark
//! write succeeds only when the caller read the currently stored version.

use super::StoreProvider;
use crate::models::{
    ExerciseCatalogEntry, FeedbackRecord, LoadProgressionRecord, Mesocycle, ProgramTemplate,
    VolumeLandmark, WorkoutExercise, WorkoutSession,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    landmarks: HashMap<(Uuid, Uuid), VolumeLandmark>,
    feedback: Vec<FeedbackRecord>,
    mesocycles: HashMap<Uuid, Mesocycle>,
    catalog: HashMap<Uuid, ExerciseCatalogEntry>,
    templates: HashMap<Uuid, ProgramTemplate>,
    sessions: HashMap<Uuid, WorkoutSession>,
    exercises: HashMap<Uuid, WorkoutExercise>,
    load_progression: HashMap<Uuid, Vec<LoadProgressionRecord>>,
    last_adjustment: HashMap<Uuid, DateTime<Utc>>,
}

/// In-process store over `RwLock`-guarded maps
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a landmark directly, bypassing the version check
    pub async fn put_landmark(&self, landmark: VolumeLandmark) {
        let mut inner = self.inner.write().await;
        inner
            .landmarks
            .insert((landmark.user_id, landmark.muscle_group_id), landmark);
    }

    /// Seed a catalog entry
    pub async fn put_catalog_entry(&self, entry: ExerciseCatalogEntry) {
        self.inner.write().await.catalog.insert(entry.id, entry);
    }

    /// Seed a program template
    pub async fn put_template(&self, template: ProgramTemplate) {
        self.inner
            .write()
            .await
            .templates
            .insert(template.id, template);
    }

    fn session_ids_of(inner: &Inner, mesocycle_id: Uuid) -> Vec<Uuid> {
        inner
            .sessions
            .values()
            .filter(|s| s.mesocycle_id == mesocycle_id)
            .map(|s| s.id)
            .collect()
    }
}

#[async_trait]
impl StoreProvider for MemoryStore {
    async fn load_landmarks(&self, user_id: Uuid) -> Result<Vec<VolumeLandmark>> {
        let inner = self.inner.read().await;
        let mut landmarks: Vec<VolumeLandmark> = inner
            .landmarks
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        landmarks.sort_by_key(|l| l.muscle_group_id);
        Ok(landmarks)
    }

    async fn save_landmark(&self, landmark: &VolumeLandmark) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let key = (landmark.user_id, landmark.muscle_group_id);
        if let Some(existing) = inner.landmarks.get(&key) {
            if existing.version != landmark.version {
                return Ok(false);
            }
        }
        let mut updated = landmark.clone();
        updated.version = landmark.version + 1;
        inner.landmarks.insert(key, updated);
        Ok(true)
    }

    async fn save_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        self.inner.write().await.feedback.push(record.clone());
        Ok(())
    }

    async fn feedback_exists(&self, session_id: Uuid) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.feedback.iter().any(|r| r.session_id == session_id))
    }

    async fn load_feedback_history(
        &self,
        user_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<FeedbackRecord>> {
        let cutoff = Utc::now() - Duration::days(i64::from(window_days));
        let inner = self.inner.read().await;
        let mut history: Vec<FeedbackRecord> = inner
            .feedback
            .iter()
            .filter(|r| r.user_id == user_id && r.recorded_at >= cutoff)
            .cloned()
            .collect();
        history.sort_by_key(|r| r.recorded_at);
        Ok(history)
    }

    async fn load_active_mesocycle(&self, user_id: Uuid) -> Result<Option<Mesocycle>> {
        let inner = self.inner.read().await;
        Ok(inner
            .mesocycles
            .values()
            .find(|m| m.user_id == user_id && m.is_active)
            .cloned())
    }

    async fn get_mesocycle(&self, mesocycle_id: Uuid) -> Result<Option<Mesocycle>> {
        Ok(self.inner.read().await.mesocycles.get(&mesocycle_id).cloned())
    }

    async fn create_mesocycle(&self, mesocycle: &Mesocycle) -> Result<()> {
        self.inner
            .write()
            .await
            .mesocycles
            .insert(mesocycle.id, mesocycle.clone());
        Ok(())
    }

    async fn save_mesocycle(&self, mesocycle: &Mesocycle) -> Result<()> {
        self.inner
            .write()
            .await
            .mesocycles
            .insert(mesocycle.id, mesocycle.clone());
        Ok(())
    }

    async fn delete_mesocycle(&self, mesocycle_id: Uuid) -> Result<()> {
        self.inner.write().await.mesocycles.remove(&mesocycle_id);
        Ok(())
    }

    async fn load_exercise_catalog(
        &self,
        exercise_ids: &[Uuid],
    ) -> Result<Vec<ExerciseCatalogEntry>> {
        let inner = self.inner.read().await;
        Ok(exercise_ids
            .iter()
            .filter_map(|id| inner.catalog.get(id).cloned())
            .collect())
    }

    async fn load_program_template(&self, template_id: Uuid) -> Result<Option<ProgramTemplate>> {
        Ok(self.inner.read().await.templates.get(&template_id).cloned())
    }

    async fn list_sessions(&self, mesocycle_id: Uuid, week: u32) -> Result<Vec<WorkoutSession>> {
        let inner = self.inner.read().await;
        let mut sessions: Vec<WorkoutSession> = inner
            .sessions
            .values()
            .filter(|s| s.mesocycle_id == mesocycle_id && s.week == week)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.day_index);
        Ok(sessions)
    }

    async fn list_session_exercises(&self, session_id: Uuid) -> Result<Vec<WorkoutExercise>> {
        let inner = self.inner.read().await;
        let mut exercises: Vec<WorkoutExercise> = inner
            .exercises
            .values()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect();
        exercises.sort_by_key(|e| e.exercise_id);
        Ok(exercises)
    }

    async fn create_workout_sessions(&self, sessions: &[WorkoutSession]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for session in sessions {
            inner.sessions.insert(session.id, session.clone());
        }
        Ok(())
    }

    async fn delete_week_sessions(&self, mesocycle_id: Uuid, week: u32) -> Result<()> {
        let mut inner = self.inner.write().await;
        let session_ids: Vec<Uuid> = inner
            .sessions
            .values()
            .filter(|s| s.mesocycle_id == mesocycle_id && s.week == week)
            .map(|s| s.id)
            .collect();
        inner
            .exercises
            .retain(|_, e| !session_ids.contains(&e.session_id));
        inner.sessions.retain(|id, _| !session_ids.contains(id));
        Ok(())
    }

    async fn create_workout_exercises(&self, exercises: &[WorkoutExercise]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for exercise in exercises {
            inner.exercises.insert(exercise.id, exercise.clone());
        }
        Ok(())
    }

    async fn delete_workout_exercises(&self, mesocycle_id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        let session_ids = Self::session_ids_of(&inner, mesocycle_id);
        inner
            .exercises
            .retain(|_, e| !session_ids.contains(&e.session_id));
        Ok(())
    }

    async fn delete_feedback_records(&self, mesocycle_id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        let session_ids = Self::session_ids_of(&inner, mesocycle_id);
        inner.feedback.retain(|f| !session_ids.contains(&f.session_id));
        Ok(())
    }

    async fn delete_workout_sessions(&self, mesocycle_id: Uuid) -> Result<()> {
        self.inner
            .write()
            .await
            .sessions
            .retain(|_, s| s.mesocycle_id != mesocycle_id);
        Ok(())
    }

    async fn load_load_progression(
        &self,
        mesocycle_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<Vec<LoadProgressionRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<LoadProgressionRecord> = inner
            .load_progression
            .get(&mesocycle_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.exercise_id == exercise_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by_key(|r| r.week);
        Ok(records)
    }

    async fn append_load_progression(
        &self,
        mesocycle_id: Uuid,
        records: &[LoadProgressionRecord],
    ) -> Result<()> {
        self.inner
            .write()
            .await
            .load_progression
            .entry(mesocycle_id)
            .or_default()
            .extend_from_slice(records);
        Ok(())
    }

    async fn delete_load_progression(&self, mesocycle_id: Uuid) -> Result<()> {
        self.inner
            .write()
            .await
            .load_progression
            .remove(&mesocycle_id);
        Ok(())
    }

    async fn load_last_adjustment(&self, user_id: Uuid) -> Result<Option<DateTime<Utc>>> {
        Ok(self.inner.read().await.last_adjustment.get(&user_id).copied())
    }

    async fn save_last_adjustment(&self, user_id: Uuid, ran_at: DateTime<Utc>) -> Result<()> {
        self.inner
            .write()
            .await
            .last_adjustment
            .insert(user_id, ran_at);
        Ok(())
    }
}
