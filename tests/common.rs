// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides seeded stores, catalogs, landmarks, and feedback helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_arguments
)]
//! Shared test utilities for `periodization_engine`
//!
//! Seeds an in-memory store with one user, one quad-focused exercise pair,
//! and a two-day program template so tests can exercise the full weekly
//! pipeline without repeating setup.

use chrono::{DateTime, Duration, Utc};
use periodization_engine::config::EngineConfig;
use periodization_engine::models::{
    ExerciseCatalogEntry, ExerciseCategory, FeedbackRecord, MuscleGroupRole, MuscleRole,
    ProgramTemplate, TemplateDay, VolumeLandmark,
};
use periodization_engine::services::EngineService;
use periodization_engine::store::MemoryStore;
use std::sync::Once;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Seeded identifiers handed to each test
pub struct TestFixture {
    pub store: MemoryStore,
    pub service: EngineService<MemoryStore>,
    pub user_id: Uuid,
    pub quads_id: Uuid,
    pub squat_id: Uuid,
    pub leg_extension_id: Uuid,
    pub template_id: Uuid,
    pub start_date: DateTime<Utc>,
}

/// A store seeded with one user: quad landmark, squat + leg extension
/// catalog entries, and a two-day template (days 0 and 2)
pub async fn seeded_fixture() -> TestFixture {
    init_test_logging();

    let store = MemoryStore::new();
    let user_id = Uuid::new_v4();
    let quads_id = Uuid::new_v4();
    let squat_id = Uuid::new_v4();
    let leg_extension_id = Uuid::new_v4();
    let template_id = Uuid::new_v4();

    store
        .put_landmark(VolumeLandmark {
            user_id,
            muscle_group_id: quads_id,
            mv: 4,
            mev: 8,
            mav: 16,
            mrv: 20,
            current_volume: 0,
            target_volume: 8,
            recovery_level: 6,
            adaptation_level: 5,
            version: 1,
        })
        .await;

    store
        .put_catalog_entry(ExerciseCatalogEntry {
            id: squat_id,
            name: "Back Squat".into(),
            category: ExerciseCategory::Compound,
            difficulty: 7,
            muscle_group_roles: vec![MuscleGroupRole {
                muscle_group_id: quads_id,
                role: MuscleRole::Primary,
                contribution_percent: 100.0,
            }],
        })
        .await;
    store
        .put_catalog_entry(ExerciseCatalogEntry {
            id: leg_extension_id,
            name: "Leg Extension".into(),
            category: ExerciseCategory::Isolation,
            difficulty: 2,
            muscle_group_roles: vec![MuscleGroupRole {
                muscle_group_id: quads_id,
                role: MuscleRole::Primary,
                contribution_percent: 100.0,
            }],
        })
        .await;

    store
        .put_template(ProgramTemplate {
            id: template_id,
            name: "Lower Body Twice Weekly".into(),
            days: vec![
                TemplateDay {
                    day_index: 0,
                    exercise_ids: vec![squat_id, leg_extension_id],
                },
                TemplateDay {
                    day_index: 2,
                    exercise_ids: vec![squat_id, leg_extension_id],
                },
            ],
        })
        .await;

    let service = EngineService::new(store.clone(), EngineConfig::default());
    TestFixture {
        store,
        service,
        user_id,
        quads_id,
        squat_id,
        leg_extension_id,
        template_id,
        start_date: Utc::now(),
    }
}

/// A feedback record with every rating at the given values, `days_ago` back
pub fn feedback(
    user_id: Uuid,
    session_id: Uuid,
    pump: u8,
    soreness: u8,
    effort: u8,
    energy: u8,
    sleep: u8,
    days_ago: i64,
) -> FeedbackRecord {
    FeedbackRecord {
        session_id,
        user_id,
        pump_quality: pump,
        muscle_soreness: soreness,
        perceived_effort: effort,
        energy_level: energy,
        sleep_quality: sleep,
        recorded_at: Utc::now() - Duration::days(days_ago),
    }
}

/// Feedback describing a run of brutal sessions: poor pump, high soreness,
/// grinding effort, low energy, bad sleep
pub fn exhausted_feedback(user_id: Uuid, session_id: Uuid, days_ago: i64) -> FeedbackRecord {
    feedback(user_id, session_id, 3, 9, 9, 3, 4, days_ago)
}
