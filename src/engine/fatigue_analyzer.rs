// ABOUTME: Aggregates scored feedback over a rolling window into trend and deload signals
// ABOUTME: Degrades to a neutral default on empty history; never an error path
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Fatigue analysis
//!
//! Scores each record in the trailing feedback window, averages fatigue,
//! derives a recovery trend from a midpoint split of the ordered series, and
//! checks the deload trigger conditions. Every triggered condition appends a
//! human-readable reason so the recommendation is auditable downstream.

use crate::config::FatigueAnalysisConfig;
use crate::engine::feedback_scorer::FeedbackScorer;
use crate::models::{DerivedScores, FeedbackRecord};
use serde::{Deserialize, Serialize};

/// Direction of the recovery trend across the analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryTrend {
    /// Recovery scores rising across the window
    Improving,
    /// Recovery scores falling across the window
    Declining,
    /// No material change
    Stable,
}

/// Outcome of fatigue analysis over the feedback window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueAnalysis {
    /// Mean fatigue score across the window (0-10)
    pub overall_fatigue: f64,
    /// Recovery direction across the window
    pub recovery_trend: RecoveryTrend,
    /// Whether a deload week is recommended
    pub deload_recommended: bool,
    /// One entry per triggered deload condition
    pub reasons: Vec<String>,
}

impl FatigueAnalysis {
    /// Neutral result reported when no feedback exists in the window
    #[must_use]
    pub fn neutral(config: &FatigueAnalysisConfig) -> Self {
        Self {
            overall_fatigue: config.neutral_fatigue,
            recovery_trend: RecoveryTrend::Stable,
            deload_recommended: false,
            reasons: Vec::new(),
        }
    }
}

/// Analyzer over an ordered (oldest first) feedback history
pub struct FatigueAnalyzer {
    scorer: FeedbackScorer,
    config: FatigueAnalysisConfig,
}

impl Default for FatigueAnalyzer {
    fn default() -> Self {
        Self::new(FeedbackScorer::default(), FatigueAnalysisConfig::default())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

impl FatigueAnalyzer {
    /// Create an analyzer with the given scorer and thresholds
    #[must_use]
    pub const fn new(scorer: FeedbackScorer, config: FatigueAnalysisConfig) -> Self {
        Self { scorer, config }
    }

    /// Feedback history window in days this analyzer expects
    #[must_use]
    pub const fn window_days(&self) -> u32 {
        self.config.window_days
    }

    /// Analyze an ordered feedback history
    ///
    /// `history` must be ordered oldest first. An empty history returns the
    /// documented neutral default and never fails.
    #[must_use]
    pub fn analyze(&self, history: &[FeedbackRecord]) -> FatigueAnalysis {
        if history.is_empty() {
            return FatigueAnalysis::neutral(&self.config);
        }

        let scores: Vec<DerivedScores> = history.iter().map(|r| self.scorer.score(r)).collect();

        let overall_fatigue = mean(scores.iter().map(|s| s.fatigue_score));
        let overall_fatigue = (overall_fatigue * 10.0).round() / 10.0;

        let recovery_trend = self.classify_trend(&scores);
        let (deload_recommended, reasons) = self.check_deload(history, &scores, overall_fatigue);

        FatigueAnalysis {
            overall_fatigue,
            recovery_trend,
            deload_recommended,
            reasons,
        }
    }

    /// Compare first-half vs second-half recovery averages around the midpoint
    fn classify_trend(&self, scores: &[DerivedScores]) -> RecoveryTrend {
        if scores.len() < 2 {
            return RecoveryTrend::Stable;
        }
        let mid = scores.len() / 2;
        let first = mean(scores[..mid].iter().map(|s| s.recovery_score));
        let second = mean(scores[mid..].iter().map(|s| s.recovery_score));

        let delta = second - first;
        if delta > self.config.trend_threshold {
            RecoveryTrend::Improving
        } else if delta < -self.config.trend_threshold {
            RecoveryTrend::Declining
        } else {
            RecoveryTrend::Stable
        }
    }

    fn check_deload(
        &self,
        history: &[FeedbackRecord],
        scores: &[DerivedScores],
        overall_fatigue: f64,
    ) -> (bool, Vec<String>) {
        let c = &self.config;
        let mut reasons = Vec::new();

        let avg_pump = mean(history.iter().map(|r| f64::from(r.pump_quality)));
        let avg_soreness = mean(history.iter().map(|r| f64::from(r.muscle_soreness)));
        let avg_effort = mean(history.iter().map(|r| f64::from(r.perceived_effort)));
        let avg_energy = mean(history.iter().map(|r| f64::from(r.energy_level)));
        let avg_sleep = mean(history.iter().map(|r| f64::from(r.sleep_quality)));

        if avg_pump < c.min_avg_pump {
            reasons.push(format!(
                "Average pump quality {avg_pump:.1} below {:.1} - stimulus response is degrading",
                c.min_avg_pump
            ));
        }
        if avg_soreness > c.max_avg_soreness {
            reasons.push(format!(
                "Average muscle soreness {avg_soreness:.1} above {:.1} - recovery is incomplete",
                c.max_avg_soreness
            ));
        }
        if avg_effort > c.max_avg_effort {
            reasons.push(format!(
                "Average perceived effort {avg_effort:.1} above {:.1} - sessions feel too hard",
                c.max_avg_effort
            ));
        }
        if avg_energy < c.min_avg_energy {
            reasons.push(format!(
                "Average energy level {avg_energy:.1} below {:.1}",
                c.min_avg_energy
            ));
        }
        if avg_sleep < c.min_avg_sleep {
            reasons.push(format!(
                "Average sleep quality {avg_sleep:.1} below {:.1}",
                c.min_avg_sleep
            ));
        }
        if overall_fatigue > c.max_overall_fatigue {
            reasons.push(format!(
                "Overall fatigue {overall_fatigue:.1} above {:.1}",
                c.max_overall_fatigue
            ));
        }

        let acute = scores
            .iter()
            .rev()
            .take(c.acute_window)
            .filter(|s| s.fatigue_score >= c.acute_fatigue_score)
            .count();
        if acute >= c.acute_trigger_count {
            reasons.push(format!(
                "{acute} of the last {} sessions scored fatigue {:.1} or higher",
                c.acute_window, c.acute_fatigue_score
            ));
        }

        (!reasons.is_empty(), reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(pump: u8, soreness: u8, effort: u8, energy: u8, sleep: u8) -> FeedbackRecord {
        FeedbackRecord {
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            pump_quality: pump,
            muscle_soreness: soreness,
            perceived_effort: effort,
            energy_level: energy,
            sleep_quality: sleep,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history_is_neutral() {
        let analysis = FatigueAnalyzer::default().analyze(&[]);
        assert!((analysis.overall_fatigue - 5.0).abs() < f64::EPSILON);
        assert_eq!(analysis.recovery_trend, RecoveryTrend::Stable);
        assert!(!analysis.deload_recommended);
        assert!(analysis.reasons.is_empty());
    }

    #[test]
    fn test_high_soreness_recommends_deload_with_reason() {
        let history: Vec<FeedbackRecord> = (0..6).map(|_| record(7, 9, 6, 7, 7)).collect();
        let analysis = FatigueAnalyzer::default().analyze(&history);

        assert!(analysis.deload_recommended);
        assert!(analysis.reasons.iter().any(|r| r.contains("soreness")));
    }

    #[test]
    fn test_fresh_history_no_deload() {
        let history: Vec<FeedbackRecord> = (0..6).map(|_| record(8, 3, 6, 8, 8)).collect();
        let analysis = FatigueAnalyzer::default().analyze(&history);

        assert!(!analysis.deload_recommended);
        assert!(analysis.reasons.is_empty());
    }

    #[test]
    fn test_declining_trend_detected() {
        // Strong first half, weak second half.
        let mut history: Vec<FeedbackRecord> = (0..4).map(|_| record(8, 2, 5, 9, 9)).collect();
        history.extend((0..4).map(|_| record(5, 7, 8, 4, 4)));

        let analysis = FatigueAnalyzer::default().analyze(&history);
        assert_eq!(analysis.recovery_trend, RecoveryTrend::Declining);
    }

    #[test]
    fn test_improving_trend_detected() {
        let mut history: Vec<FeedbackRecord> = (0..4).map(|_| record(5, 7, 8, 4, 4)).collect();
        history.extend((0..4).map(|_| record(8, 2, 5, 9, 9)));

        let analysis = FatigueAnalyzer::default().analyze(&history);
        assert_eq!(analysis.recovery_trend, RecoveryTrend::Improving);
    }

    #[test]
    fn test_acute_fatigue_in_recent_records() {
        // Calm window except two acutely fatiguing sessions at the end.
        let mut history: Vec<FeedbackRecord> = (0..5).map(|_| record(7, 4, 6, 7, 7)).collect();
        history.push(record(6, 9, 10, 2, 3));
        history.push(record(6, 9, 10, 2, 3));

        let analysis = FatigueAnalyzer::default().analyze(&history);
        assert!(analysis.deload_recommended);
        assert!(analysis
            .reasons
            .iter()
            .any(|r| r.contains("last 3 sessions")));
    }

    #[test]
    fn test_single_record_trend_is_stable() {
        let analysis = FatigueAnalyzer::default().analyze(&[record(7, 4, 6, 7, 7)]);
        assert_eq!(analysis.recovery_trend, RecoveryTrend::Stable);
    }
}
