// ABOUTME: Scheduled auto-adjustment: periodically lowers volume targets when fatigue warrants
// ABOUTME: Runs under the same per-user lock as week advancement, at most once per configured interval
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Scheduled volume auto-adjustment
//!
//! A background pass that re-runs fatigue analysis for a user with an active
//! mesocycle and, when a deload is recommended mid-week, pulls the affected
//! volume targets down toward the deload level without waiting for the next
//! week boundary. The due-date check is pure so the schedule is testable
//! without a clock.

use crate::config::EngineConfig;
use crate::engine::fatigue_analyzer::FatigueAnalyzer;
use crate::engine::feedback_scorer::FeedbackScorer;
use crate::engine::orchestrator::UserLocks;
use crate::errors::{AppError, AppResult};
use crate::store::{with_store_policy, StoreProvider};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Whether an adjustment pass is due for a user
///
/// Due when the user has never been adjusted, or when at least
/// `frequency_days` have elapsed since the last run.
#[must_use]
pub fn adjustment_due(
    last_run: Option<DateTime<Utc>>,
    frequency_days: u32,
    now: DateTime<Utc>,
) -> bool {
    last_run.is_none_or(|ran_at| now - ran_at >= Duration::days(i64::from(frequency_days)))
}

/// Outcome of one auto-adjustment pass for a user
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AdjustmentOutcome {
    /// User the pass ran for
    pub user_id: Uuid,
    /// Whether any landmark target was lowered
    pub adjusted: bool,
    /// Muscle groups whose targets were lowered
    pub lowered_groups: Vec<Uuid>,
}

/// Periodic fatigue-driven volume adjustment
pub struct AutoAdjustmentTask<S: StoreProvider> {
    store: S,
    config: EngineConfig,
    analyzer: FatigueAnalyzer,
    locks: Arc<UserLocks>,
}

impl<S: StoreProvider> AutoAdjustmentTask<S> {
    /// Create the task over a store, sharing the orchestrator's lock map
    #[must_use]
    pub fn new(store: S, config: EngineConfig, locks: Arc<UserLocks>) -> Self {
        let analyzer = FatigueAnalyzer::new(
            FeedbackScorer::new(config.scoring.clone()),
            config.fatigue.clone(),
        );
        Self {
            store,
            config,
            analyzer,
            locks,
        }
    }

    /// Run one adjustment pass for a user if one is due
    ///
    /// No-op (returning `adjusted: false`) when the pass is not yet due,
    /// when the user has no active mesocycle, or when fatigue analysis does
    /// not recommend a deload. Otherwise each landmark's target is lowered
    /// to the deload volume where it currently sits above it.
    ///
    /// # Errors
    /// `ConcurrentModification` when a landmark version check fails, or a
    /// store error.
    pub async fn run_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<AdjustmentOutcome> {
        let skipped = AdjustmentOutcome {
            user_id,
            adjusted: false,
            lowered_groups: Vec::new(),
        };

        let last_run = self
            .call("load_last_adjustment", || {
                self.store.load_last_adjustment(user_id)
            })
            .await?;
        if !adjustment_due(last_run, self.config.auto_adjustment.frequency_days, now) {
            debug!(%user_id, "auto-adjustment not yet due");
            return Ok(skipped);
        }

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let Some(_mesocycle) = self
            .call("load_active_mesocycle", || {
                self.store.load_active_mesocycle(user_id)
            })
            .await?
        else {
            debug!(%user_id, "no active mesocycle, skipping auto-adjustment");
            return Ok(skipped);
        };

        let history = self
            .call("load_feedback_history", || {
                self.store
                    .load_feedback_history(user_id, self.analyzer.window_days())
            })
            .await?;
        let fatigue = self.analyzer.analyze(&history);

        self.call("save_last_adjustment", || {
            self.store.save_last_adjustment(user_id, now)
        })
        .await?;

        if !fatigue.deload_recommended {
            debug!(%user_id, fatigue = fatigue.overall_fatigue, "no deload warranted");
            return Ok(skipped);
        }

        let landmarks = self
            .call("load_landmarks", || self.store.load_landmarks(user_id))
            .await?;

        let mut lowered_groups = Vec::new();
        for landmark in &landmarks {
            let deload_sets = deload_target(landmark.mev, self.config.volume.deload_factor);
            if landmark.target_volume <= deload_sets {
                continue;
            }
            let mut updated = landmark.clone();
            updated.target_volume = deload_sets;
            let written = self
                .call("save_landmark", || self.store.save_landmark(&updated))
                .await?;
            if !written {
                return Err(AppError::concurrent_modification(format!(
                    "landmark for muscle group {} changed during auto-adjustment",
                    landmark.muscle_group_id
                ))
                .with_user_id(user_id));
            }
            lowered_groups.push(landmark.muscle_group_id);
        }

        info!(
            %user_id,
            lowered = lowered_groups.len(),
            reasons = ?fatigue.reasons,
            "auto-adjustment lowered volume targets"
        );
        Ok(AdjustmentOutcome {
            user_id,
            adjusted: !lowered_groups.is_empty(),
            lowered_groups,
        })
    }

    async fn call<T, F, Fut>(&self, operation: &str, f: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<T>>,
    {
        with_store_policy(&self.config.store, operation, f).await
    }
}

fn deload_target(mev: u32, deload_factor: f64) -> u32 {
    (f64::from(mev) * deload_factor).round() as u32
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_adjustment_due_when_never_run() {
        assert!(adjustment_due(None, 7, Utc::now()));
    }

    #[test]
    fn test_adjustment_not_due_within_interval() {
        let now = Utc::now();
        assert!(!adjustment_due(Some(now - Duration::days(3)), 7, now));
    }

    #[test]
    fn test_adjustment_due_at_exact_interval() {
        let now = Utc::now();
        assert!(adjustment_due(Some(now - Duration::days(7)), 7, now));
    }

    #[test]
    fn test_deload_target_rounds() {
        assert_eq!(deload_target(10, 0.7), 7);
        assert_eq!(deload_target(9, 0.7), 6);
    }
}
