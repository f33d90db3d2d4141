// ABOUTME: Tests for fatigue-triggered deload overrides during week advancement
// ABOUTME: Validates that sustained poor feedback forces deload volume regardless of calendar phase
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{exhausted_feedback, seeded_fixture};
use periodization_engine::models::MesocyclePhase;
use uuid::Uuid;

#[tokio::test]
async fn test_sustained_poor_feedback_recommends_deload() {
    let fx = seeded_fixture().await;
    for days_ago in 0..5 {
        fx.service
            .submit_feedback(&exhausted_feedback(fx.user_id, Uuid::new_v4(), days_ago))
            .await
            .unwrap();
    }

    let analysis = fx.service.get_fatigue_analysis(fx.user_id).await.unwrap();
    assert!(analysis.deload_recommended);
    assert!(!analysis.reasons.is_empty());
    assert!(analysis.overall_fatigue > 6.5);
}

#[tokio::test]
async fn test_fatigue_override_forces_deload_week() {
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
    for days_ago in 0..5 {
        fx.service
            .submit_feedback(&exhausted_feedback(fx.user_id, Uuid::new_v4(), days_ago))
            .await
            .unwrap();
    }

    let outcome = fx.service.advance_mesocycle_week(mesocycle.id).await.unwrap();

    // Week 2 of 6 would normally be accumulation at 10 sets.
    assert!(outcome.fatigue.deload_recommended);
    assert_eq!(outcome.phase, MesocyclePhase::Deload);
    assert_eq!(outcome.plans[0].target.phase, MesocyclePhase::Deload);
    assert_eq!(outcome.plans[0].target.target_sets, 6);
}

#[tokio::test]
async fn test_good_feedback_keeps_planned_phase() {
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
    for days_ago in 0..5 {
        fx.service
            .submit_feedback(&common::feedback(
                fx.user_id,
                Uuid::new_v4(),
                8,
                3,
                6,
                8,
                8,
                days_ago,
            ))
            .await
            .unwrap();
    }

    let outcome = fx.service.advance_mesocycle_week(mesocycle.id).await.unwrap();
    assert!(!outcome.fatigue.deload_recommended);
    assert_eq!(outcome.phase, MesocyclePhase::Accumulation);
    assert_eq!(outcome.plans[0].target.target_sets, 10);
}
