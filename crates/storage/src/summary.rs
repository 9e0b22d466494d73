//! Session summary types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weekday desk session totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySessionSummary {
    pub duration_secs: u64,
    pub blink_count: u64,
    /// Completed bad-posture time, never more than the session duration
    pub bad_posture_secs: u64,
}

impl WeekdaySessionSummary {
    /// Build a summary, truncating bad posture to whole seconds and capping
    /// it at the session duration
    pub fn new(duration_secs: u64, blink_count: u64, bad_posture_secs: f64) -> Self {
        let bad = bad_posture_secs.max(0.0) as u64;
        Self {
            duration_secs,
            blink_count,
            bad_posture_secs: bad.min(duration_secs),
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        minutes(self.duration_secs)
    }

    pub fn bad_posture_minutes(&self) -> f64 {
        minutes(self.bad_posture_secs)
    }
}

/// Weekend yoga session totals
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YogaSessionSummary {
    pub duration_secs: u64,
    /// Completed holds keyed by pose name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub holds: BTreeMap<String, u32>,
}

impl YogaSessionSummary {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            holds: BTreeMap::new(),
        }
    }

    pub fn with_holds(mut self, holds: impl IntoIterator<Item = (String, u32)>) -> Self {
        self.holds.extend(holds);
        self
    }

    pub fn duration_minutes(&self) -> f64 {
        minutes(self.duration_secs)
    }
}

/// A summary from either mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SessionSummary {
    Weekday(WeekdaySessionSummary),
    Yoga(YogaSessionSummary),
}

impl SessionSummary {
    pub fn duration_secs(&self) -> u64 {
        match self {
            SessionSummary::Weekday(s) => s.duration_secs,
            SessionSummary::Yoga(s) => s.duration_secs,
        }
    }
}

impl From<WeekdaySessionSummary> for SessionSummary {
    fn from(summary: WeekdaySessionSummary) -> Self {
        SessionSummary::Weekday(summary)
    }
}

impl From<YogaSessionSummary> for SessionSummary {
    fn from(summary: YogaSessionSummary) -> Self {
        SessionSummary::Yoga(summary)
    }
}

fn minutes(secs: u64) -> f64 {
    (secs as f64 / 60.0 * 100.0).round() / 100.0
}
