//! Aggregate statistics over wellness entries.
//!
//! Two views are produced: an overall summary (means across the whole
//! history) and a weekly summary over the most recent entries, including
//! progress toward the weekly study goal.

use crate::WellnessEntry;
use serde::{Deserialize, Serialize};

/// Default weekly study goal in hours
pub const WEEKLY_STUDY_GOAL_HOURS: f64 = 35.0;

/// How many recent entries the weekly summary covers
const WEEKLY_WINDOW_LEN: usize = 7;

/// Means across the entire entry history, rounded to one decimal place
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OverallSummary {
    pub entries: usize,
    pub avg_sleep_hours: f64,
    pub avg_stress_level: f64,
    pub avg_study_hours: f64,
}

/// Aggregates over the most recent entries plus study-goal progress
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklySummary {
    pub entries: usize,
    pub avg_sleep_hours: f64,
    pub avg_stress_level: f64,
    pub avg_study_hours: f64,
    pub study_hours_total: f64,
    pub goal_hours: f64,
    /// Fraction of the goal reached, clamped to [0, 1]
    pub goal_progress: f64,
}

/// Compute overall means; None when there are no entries
pub fn overall_summary(entries: &[WellnessEntry]) -> Option<OverallSummary> {
    if entries.is_empty() {
        return None;
    }

    let n = entries.len() as f64;
    let sleep: f64 = entries.iter().map(|e| e.sleep_hours).sum();
    let stress: f64 = entries.iter().map(|e| e.stress_level as f64).sum();
    let study: f64 = entries.iter().map(|e| e.study_hours).sum();

    Some(OverallSummary {
        entries: entries.len(),
        avg_sleep_hours: round1(sleep / n),
        avg_stress_level: round1(stress / n),
        avg_study_hours: round1(study / n),
    })
}

/// Compute the weekly summary over the most recent entries
///
/// `entries` must be in ascending chronological order; the window is the last
/// `WEEKLY_WINDOW_LEN` of them. None when there are no entries.
pub fn weekly_summary(entries: &[WellnessEntry], goal_hours: f64) -> Option<WeeklySummary> {
    let window = recent_window(entries, WEEKLY_WINDOW_LEN);
    if window.is_empty() {
        return None;
    }

    let n = window.len() as f64;
    let sleep: f64 = window.iter().map(|e| e.sleep_hours).sum();
    let stress: f64 = window.iter().map(|e| e.stress_level as f64).sum();
    let study: f64 = window.iter().map(|e| e.study_hours).sum();

    let progress = if goal_hours > 0.0 {
        (study / goal_hours).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(WeeklySummary {
        entries: window.len(),
        avg_sleep_hours: round1(sleep / n),
        avg_stress_level: round1(stress / n),
        avg_study_hours: round1(study / n),
        study_hours_total: round1(study),
        goal_hours,
        goal_progress: progress,
    })
}

/// The trailing `len` entries of an ascending-ordered slice, still ascending
pub fn recent_window(entries: &[WellnessEntry], len: usize) -> &[WellnessEntry] {
    let start = entries.len().saturating_sub(len);
    &entries[start..]
}

/// Round to one decimal place, half away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
