// ABOUTME: Tests for materializing a mesocycle's first week from a program template
// ABOUTME: Validates session layout, default prescriptions, idempotence, and ownership checks
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::seeded_fixture;
use periodization_engine::errors::ErrorCode;
use periodization_engine::store::StoreProvider;
use uuid::Uuid;

#[tokio::test]
async fn test_template_materializes_first_week() {
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

    assert_eq!(sessions.len(), 2);
    let mut days: Vec<u32> = sessions.iter().map(|s| s.day_index).collect();
    days.sort_unstable();
    assert_eq!(days, vec![0, 2]);

    for session in &sessions {
        assert_eq!(session.week, 1);
        let exercises = fx.store.list_session_exercises(session.id).await.unwrap();
        assert_eq!(exercises.len(), 2);
        for exercise in &exercises {
            assert_eq!(exercise.sets, 3);
            assert_eq!(exercise.target_reps, 10);
            assert!(exercise.weight.is_none());
        }
    }
}

#[tokio::test]
async fn test_template_generation_is_not_repeatable() {
    let fx = seeded_fixture().await;
    let mesocycle = fx
        .service
        .create_mesocycle(fx.user_id, fx.start_date, 6)
        .await
        .unwrap();
    fx.service
        .generate_program_from_template(fx.user_id, fx.template_id, mesocycle.id)
        .await
        .unwrap();

    let err = fx
        .service
        .generate_program_from_template(fx.user_id, fx.template_id, mesocycle.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateGeneration);

    // No extra sessions were written by the rejected call.
    let sessions = fx.store.list_sessions(mesocycle.id, 1).await.unwrap();
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn test_template_generation_checks_ownership() {
    let fx = seeded_fixture().await;
    let mesocycle = fx
        .service
        .create_mesocycle(fx.user_id, fx.start_date, 6)
        .await
        .unwrap();

    let err = fx
        .service
        .generate_program_from_template(Uuid::new_v4(), fx.template_id, mesocycle.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_template_generation_missing_template() {
    let fx = seeded_fixture().await;
    let mesocycle = fx
        .service
        .create_mesocycle(fx.user_id, fx.start_date, 6)
        .await
        .unwrap();

    let err = fx
        .service
        .generate_program_from_template(fx.user_id, Uuid::new_v4(), mesocycle.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
