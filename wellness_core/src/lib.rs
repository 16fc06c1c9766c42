#![forbid(unsafe_code)]

//! Core domain model and analytics for the Keel wellness tracker.
//!
//! This crate provides:
//! - Domain types (entries, moods, courses, assessments)
//! - Streak, summary, motivation, and insight analytics
//! - Course grade requirement evaluation and risk ranking
//! - Persistence (journal, CSV archive, course portfolio)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod streak;
pub mod summary;
pub mod motivation;
pub mod insights;
pub mod planner;
pub mod journal;
pub mod archive;
pub mod history;
pub mod portfolio;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use journal::{EntrySink, JsonlJournal};
pub use history::load_entries;
pub use streak::{logged_today, streak_length};
pub use summary::{overall_summary, weekly_summary, OverallSummary, WeeklySummary};
pub use motivation::{pick_message, MotivationMessage};
pub use insights::{generate_insights, Insight};
pub use planner::{evaluate_course, rank_courses, rank_detailed, RankedCourse, RiskPolicy};
pub use portfolio::CoursePortfolio;
