// ABOUTME: Engine configuration root aggregating scoring, progression, and store settings
// ABOUTME: All values carry scientific defaults; the host application owns persistence and env parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration management for the periodization engine
//!
//! Plain serde structs with `Default` implementations. The engine never reads
//! the environment; embedders construct and inject an [`EngineConfig`].

/// Volume and load progression settings
pub mod progression;

/// Feedback scoring weights and fatigue analysis thresholds
pub mod scoring;

/// Store call deadlines and retry policy
pub mod store;

pub use progression::{DistributionConfig, LoadProgressionConfig, VolumeProgressionConfig};
pub use scoring::{FatigueAnalysisConfig, ScoringWeightsConfig};
pub use store::StoreConfig;

use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Feedback scoring weights
    pub scoring: ScoringWeightsConfig,
    /// Fatigue analysis window and deload thresholds
    pub fatigue: FatigueAnalysisConfig,
    /// Weekly volume progression modifiers
    pub volume: VolumeProgressionConfig,
    /// Set distribution caps and warning thresholds
    pub distribution: DistributionConfig,
    /// Load progression increments and ceilings
    pub load: LoadProgressionConfig,
    /// Store call policy
    pub store: StoreConfig,
    /// Scheduled auto-adjustment cadence
    pub auto_adjustment: AutoAdjustmentConfig,
}

/// Cadence settings for the externally scheduled auto-adjustment task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoAdjustmentConfig {
    /// Minimum days between adjustment runs for a user
    pub frequency_days: u32,
}

impl Default for AutoAdjustmentConfig {
    fn default() -> Self {
        Self { frequency_days: 7 }
    }
}
