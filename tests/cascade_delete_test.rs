// ABOUTME: Tests for mesocycle deletion and its dependent-record cascade
// ABOUTME: Validates that sessions, exercises, feedback, and load history all disappear
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{feedback, seeded_fixture};
use periodization_engine::errors::ErrorCode;
use periodization_engine::models::LoadProgressionRecord;
use periodization_engine::store::StoreProvider;
use uuid::Uuid;

#[tokio::test]
async fn test_delete_cascades_to_all_dependents() {
    let fx = seeded_fixture().await;
    let mesocycle = fx
        .service
        .create_mesocycle(fx.user_id, fx.start_date, 6)
        .await
        .unwrap();
    let sessions = fx
        .service
        .generate_program_from_template(fx.user_id, fx.template_id, mesocycle.id)
        .await
        .unwrap();

    // Attach feedback and load history to the generated week.
    fx.service
        .submit_feedback(&feedback(fx.user_id, sessions[0].id, 7, 4, 6, 7, 7, 0))
        .await
        .unwrap();
    fx.store
        .append_load_progression(
            mesocycle.id,
            &[LoadProgressionRecord {
                exercise_id: fx.squat_id,
                week: 1,
                weight: 100.0,
                reps: 8,
                rpe: 8.0,
                rir: 2.0,
            }],
        )
        .await
        .unwrap();

    fx.service.delete_mesocycle(mesocycle.id).await.unwrap();

    assert!(fx
        .store
        .get_mesocycle(mesocycle.id)
        .await
        .unwrap()
        .is_none());
    assert!(fx.store.list_sessions(mesocycle.id, 1).await.unwrap().is_empty());
    assert!(fx
        .store
        .list_session_exercises(sessions[0].id)
        .await
        .unwrap()
        .is_empty());
    assert!(fx
        .store
        .load_load_progression(mesocycle.id, fx.squat_id)
        .await
        .unwrap()
        .is_empty());
    assert!(fx
        .store
        .load_feedback_history(fx.user_id, 30)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_missing_mesocycle() {
    let fx = seeded_fixture().await;
    let err = fx
        .service
        .delete_mesocycle(Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_delete_frees_user_for_new_block() {
    let fx = seeded_fixture().await;
    let first = fx
        .service
        .create_mesocycle(fx.user_id, fx.start_date, 6)
        .await
        .unwrap();
    fx.service.delete_mesocycle(first.id).await.unwrap();

    // The active-mesocycle slot is free again.
    let second = fx
        .service
        .create_mesocycle(fx.user_id, fx.start_date, 4)
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
}
