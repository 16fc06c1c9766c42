//! Logging streak computation.
//!
//! A streak counts consecutive local calendar days with at least one entry,
//! anchored at the most recent entry day. The anchor is deliberately not
//! "today": a user who logged yesterday but not yet today still sees their
//! run intact, and it only resets once a full day is skipped.

use crate::{LocalClock, WellnessEntry};
use chrono::{Duration, NaiveDate};

/// Length of the current logging streak in days
///
/// Multiple entries on the same local day count once. Returns 0 when there
/// are no entries at all.
pub fn streak_length(entries: &[WellnessEntry], clock: &LocalClock) -> u32 {
    let days = distinct_days_desc(entries, clock);

    let Some(&anchor) = days.first() else {
        return 0;
    };

    let mut streak = 0u32;
    let mut expected = anchor;
    for &day in &days {
        if day == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else {
            // Days are strictly descending, so the first mismatch is a gap
            break;
        }
    }

    streak
}

/// Whether any entry falls on today's local calendar day
pub fn logged_today(entries: &[WellnessEntry], clock: &LocalClock) -> bool {
    let today = clock.today();
    entries.iter().any(|e| clock.day_of(e.created_at) == today)
}

/// Distinct local calendar days carrying entries, most recent first
fn distinct_days_desc(entries: &[WellnessEntry], clock: &LocalClock) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = entries
        .iter()
        .map(|e| clock.day_of(e.created_at))
        .collect();
    days.sort_unstable();
    days.dedup();
    days.reverse();
    days
}
