//! Motivational message selection.
//!
//! A short ordered decision list runs over the three most recent entries.
//! The first matching rule wins; with no entries the user is invited to
//! start, and with no match a neutral consistency nudge is shown.

use crate::summary::recent_window;
use crate::WellnessEntry;
use serde::{Deserialize, Serialize};

/// How many recent entries feed the decision list
const MOTIVATION_WINDOW_LEN: usize = 3;

/// The selected motivational message
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MotivationMessage {
    GettingStarted,
    DoingGreat,
    SleepAttention,
    HighStress,
    SleepPraise,
    StayConsistent,
}

impl MotivationMessage {
    /// User-facing text for the message
    pub fn text(&self) -> &'static str {
        match self {
            MotivationMessage::GettingStarted => "Let's start tracking your wellness journey",
            MotivationMessage::DoingGreat => "You're doing great! Keep it up",
            MotivationMessage::SleepAttention => "Your sleep could use some attention",
            MotivationMessage::HighStress => "High stress detected - take care of yourself",
            MotivationMessage::SleepPraise => "Great sleep habits!",
            MotivationMessage::StayConsistent => "Stay consistent with your wellness goals",
        }
    }
}

/// Decision list over (avg sleep, avg stress); first match wins. Order
/// matters because the ranges overlap.
const DECISION_LIST: &[(fn(f64, f64) -> bool, MotivationMessage)] = &[
    (
        |sleep, stress| sleep >= 7.0 && stress <= 5.0,
        MotivationMessage::DoingGreat,
    ),
    (|sleep, _| sleep < 6.0, MotivationMessage::SleepAttention),
    (|_, stress| stress >= 8.0, MotivationMessage::HighStress),
    (|sleep, _| sleep >= 7.0, MotivationMessage::SleepPraise),
];

/// Pick the motivational message for the given history
///
/// `entries` must be in ascending chronological order.
pub fn pick_message(entries: &[WellnessEntry]) -> MotivationMessage {
    if entries.is_empty() {
        return MotivationMessage::GettingStarted;
    }

    let window = recent_window(entries, MOTIVATION_WINDOW_LEN);
    let n = window.len() as f64;
    let avg_sleep: f64 = window.iter().map(|e| e.sleep_hours).sum::<f64>() / n;
    let avg_stress: f64 = window.iter().map(|e| e.stress_level as f64).sum::<f64>() / n;

    for (matches, message) in DECISION_LIST {
        if matches(avg_sleep, avg_stress) {
            return *message;
        }
    }

    MotivationMessage::StayConsistent
}
