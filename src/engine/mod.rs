// ABOUTME: Core computation engine: scoring, fatigue, volume, distribution, load, orchestration
// ABOUTME: Pure calculators plus the stateful orchestrator that ties them to the store
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Periodization engine components
//!
//! Everything below the orchestrator is a pure calculator: deterministic
//! output from explicit inputs, no store access, no clock access. The
//! orchestrator and the scheduled adjustment task own all I/O.

pub mod auto_adjustment;
pub mod fatigue_analyzer;
pub mod feedback_scorer;
pub mod load_progression;
pub mod orchestrator;
pub mod volume_distribution;
pub mod volume_progression;

pub use auto_adjustment::{AdjustmentOutcome, AutoAdjustmentTask};
pub use fatigue_analyzer::{FatigueAnalysis, FatigueAnalyzer, RecoveryTrend};
pub use feedback_scorer::FeedbackScorer;
pub use load_progression::{
    ExercisePerformance, LoadProgressionAdvisor, LoadRecommendation, ProgressionTrend,
    ProgressionType,
};
pub use orchestrator::{
    LoadAdjustment, MesocycleOrchestrator, MuscleGroupPlan, UserLocks, WeekAdvanceOutcome,
};
pub use volume_distribution::{
    ExerciseCandidate, VolumeDistribution, VolumeDistributionAllocator,
};
pub use volume_progression::{VolumeProgressionCalculator, VolumeTarget};
