//! Core domain types for Keel.
//!
//! This module defines the fundamental types used throughout the system:
//! - Wellness log entries and moods
//! - Courses, assessments, and their evaluation results
//! - Risk tiers and the ranking wire contract
//! - The caller-supplied clock snapshot

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Wellness Log Types
// ============================================================================

/// Self-reported mood attached to a daily log entry
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Mood {
    /// Parse a mood from user input (case-insensitive)
    pub fn parse(s: &str) -> Option<Mood> {
        match s.to_lowercase().as_str() {
            "great" => Some(Mood::Great),
            "good" => Some(Mood::Good),
            "okay" | "ok" => Some(Mood::Okay),
            "bad" => Some(Mood::Bad),
            "terrible" => Some(Mood::Terrible),
            _ => None,
        }
    }

    /// Display label for the mood
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::Bad => "Bad",
            Mood::Terrible => "Terrible",
        }
    }

    /// Canonical lowercase token, as stored on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Terrible => "terrible",
        }
    }
}

/// A single daily wellness log entry
///
/// Entries are created once at submission time and never mutated. The caller
/// enforces at most one entry per calendar day; the core only detects
/// same-day duplicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WellnessEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Hours slept, [0, 24]
    pub sleep_hours: f64,
    /// Stress level, 1-10
    pub stress_level: u8,
    /// Hours studied, [0, 24]
    pub study_hours: f64,
    pub mood: Mood,
}

// ============================================================================
// Clock Snapshot
// ============================================================================

/// Caller-supplied clock snapshot: the current instant plus the user's local
/// UTC offset.
///
/// All calendar-day normalization goes through this type so the analytics
/// never read ambient time. Streaks and the logged-today check care about the
/// user's *local* date, not the UTC date of the instant.
#[derive(Clone, Copy, Debug)]
pub struct LocalClock {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl LocalClock {
    /// Snapshot the system clock and local offset
    pub fn system() -> Self {
        Self {
            now: Utc::now(),
            offset: *Local::now().offset(),
        }
    }

    /// Build a fixed snapshot (deterministic; the usual choice in tests)
    pub fn fixed(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Today's calendar day in the local offset
    pub fn today(&self) -> NaiveDate {
        self.day_of(self.now)
    }

    /// The local calendar day an instant falls on
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }
}

// ============================================================================
// Course Planning Types
// ============================================================================

/// One weighted piece of a course grade (exam, project, ...)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Assessment {
    pub name: String,
    /// Percentage of the total course grade, (0, 100]
    pub weight: f64,
    /// Grade in [0, 100]; None means not yet completed
    #[serde(default)]
    pub grade: Option<f64>,
}

/// A course with a target grade and its weighted assessments
///
/// Assessment order is insertion order; it matters for display only, never
/// for evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    /// Target grade percentage, [0, 100]
    pub target_grade: f64,
    pub assessments: Vec<Assessment>,
}

/// Ranking request wire shape: the batch of courses to evaluate together
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub courses: Vec<Course>,
}

/// How achievable a course's target grade is, given current progress
///
/// Variants are listed from least to most urgent. The serialized form is the
/// variant name itself ("Achieved", "OnTrack", ...), which is the observable
/// wire value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskTier {
    Achieved,
    OnTrack,
    Watch,
    Critical,
    Unrealistic,
}

impl RiskTier {
    /// Urgency used for priority ranking (higher = ranked first)
    pub fn severity(&self) -> u8 {
        match self {
            RiskTier::Achieved => 0,
            RiskTier::OnTrack => 1,
            RiskTier::Watch => 2,
            RiskTier::Critical => 3,
            RiskTier::Unrealistic => 4,
        }
    }
}

/// Full per-course evaluation figures, for display
#[derive(Clone, Debug)]
pub struct CourseEvaluation {
    pub course: String,
    pub target_grade: f64,
    /// Weighted average over graded work; None when nothing is graded yet
    pub current_grade: Option<f64>,
    /// Sum of weights with a grade
    pub completed_weight: f64,
    /// Ungraded weight, including the implicit remainder of a sub-100 total
    pub remaining_weight: f64,
    /// Average needed on remaining weight to reach the target; None when
    /// nothing remains
    pub required_average: Option<f64>,
    pub risk: RiskTier,
}

/// Ranking response wire shape, one per submitted course
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankingResult {
    pub course: String,
    /// 1-based rank within the submitted batch, most urgent first
    pub priority: u32,
    pub risk: RiskTier,
    pub required_average: Option<f64>,
}
