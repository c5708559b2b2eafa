//! The point-in-time situational assessment and its intervention signals.

use crate::context::ambient::TimeOfDay;
use crate::detection::types::DetectedObject;
use serde::{Deserialize, Serialize};

/// What the student appears to be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Studying,
    Socializing,
    Creating,
    Resting,
    Commuting,
    Unknown,
}

/// Estimated mood, derived from stress and focus scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Focused,
    Stressed,
    Frustrated,
    Distracted,
    Balanced,
}

/// Priority of an intervention signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPriority {
    Low,
    Medium,
    High,
}

/// A suggestion fired by the analyzer. Signals are independent; any subset
/// may fire for a single scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionSignal {
    /// Machine-readable trigger name ("low_focus", "high_stress", ...)
    pub trigger: String,
    pub priority: SignalPriority,
    /// Display-ready notification copy
    pub message: String,
}

/// A point-in-time situational assessment.
///
/// The three `[0, 1]` scores are always produced, even with zero
/// detections, so downstream consumers never branch on missing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentScan {
    /// Normalized detections that fed this scan
    pub objects: Vec<DetectedObject>,
    /// Number of people in the scene
    pub people_count: usize,
    pub activity: Activity,
    pub mood: Mood,
    /// Predicted intent ("complete coursework", "social recharge", ...)
    pub intent: String,
    pub location: String,
    pub time_of_day: TimeOfDay,
    /// Attention estimate in `[0, 1]`
    pub focus_level: f64,
    /// Energy estimate in `[0, 1]`
    pub energy_level: f64,
    /// Stress estimate in `[0, 1]`
    pub stress_level: f64,
    /// True when any score was produced from fallback formulas because
    /// faces or ambient readings were missing
    pub degraded: bool,
}
