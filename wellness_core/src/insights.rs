//! Wellness insight generation.
//!
//! Unlike the motivation decision list, insight rules accumulate: every rule
//! that matches the overall history contributes one insight. A history that
//! trips no rule gets the balanced fallback instead.

use crate::WellnessEntry;
use serde::{Deserialize, Serialize};

/// One observation derived from the whole entry history
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    LowSleep,
    HighStress,
    StudyStressLink,
    ConsistentTracking,
    Balanced,
}

impl Insight {
    /// User-facing text for the insight
    pub fn text(&self) -> &'static str {
        match self {
            Insight::LowSleep => {
                "Your average sleep is below 7 hours. Consider prioritizing rest."
            }
            Insight::HighStress => {
                "Your stress levels are consistently high. Consider adding recovery time."
            }
            Insight::StudyStressLink => {
                "Higher study hours appear to be associated with increased stress."
            }
            Insight::ConsistentTracking => {
                "You have been consistently tracking your wellness. Keep it up!"
            }
            Insight::Balanced => {
                "Your wellness data looks balanced. Keep maintaining healthy habits."
            }
        }
    }
}

/// Averages and counts the rules inspect
#[derive(Clone, Copy, Debug)]
struct Aggregates {
    avg_sleep: f64,
    avg_stress: f64,
    avg_study: f64,
    entries: usize,
}

/// Accumulating rules, applied in listed order
const INSIGHT_RULES: &[(fn(&Aggregates) -> bool, Insight)] = &[
    (|a| a.avg_sleep < 7.0, Insight::LowSleep),
    (|a| a.avg_stress >= 7.0, Insight::HighStress),
    (
        |a| a.avg_study >= 4.0 && a.avg_stress >= 7.0,
        Insight::StudyStressLink,
    ),
    (|a| a.entries >= 5, Insight::ConsistentTracking),
];

/// Generate insights over the entire history
///
/// Returns an empty list when there are no entries; otherwise at least one
/// insight is always produced.
pub fn generate_insights(entries: &[WellnessEntry]) -> Vec<Insight> {
    if entries.is_empty() {
        return Vec::new();
    }

    let n = entries.len() as f64;
    let aggregates = Aggregates {
        avg_sleep: entries.iter().map(|e| e.sleep_hours).sum::<f64>() / n,
        avg_stress: entries.iter().map(|e| e.stress_level as f64).sum::<f64>() / n,
        avg_study: entries.iter().map(|e| e.study_hours).sum::<f64>() / n,
        entries: entries.len(),
    };

    let mut insights: Vec<Insight> = INSIGHT_RULES
        .iter()
        .filter(|(matches, _)| matches(&aggregates))
        .map(|(_, insight)| *insight)
        .collect();

    if insights.is_empty() {
        insights.push(Insight::Balanced);
    }

    insights
}
