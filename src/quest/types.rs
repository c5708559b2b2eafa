//! Quest data model and the generation context supplied by callers.

use crate::context::scan::EnvironmentScan;
use crate::error::{ensure_unit_range, EngineError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quest archetype selected by the generation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Foundation,
    Acceleration,
    Wellness,
    Social,
    Portfolio,
}

impl QuestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestCategory::Foundation => "foundation",
            QuestCategory::Acceleration => "acceleration",
            QuestCategory::Wellness => "wellness",
            QuestCategory::Social => "social",
            QuestCategory::Portfolio => "portfolio",
        }
    }
}

/// Display-facing quest type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Learning,
    Focus,
    Social,
    Wellness,
}

/// What kind of work an objective asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Action,
    Create,
    Collect,
    Reflect,
}

/// One unit of work inside a quest. Quantity is always at least 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: Uuid,
    pub description: String,
    pub kind: ObjectiveKind,
    pub quantity: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Xp,
    Tokens,
}

/// A reward granted on quest completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub kind: RewardKind,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Reward {
    pub fn new(kind: RewardKind, value: u32, label: &str) -> Self {
        Self {
            kind,
            value,
            label: Some(label.to_string()),
        }
    }
}

/// A generated, time-boxed task with objectives and rewards.
///
/// Immutable once generated; re-calibration produces a new value rather
/// than editing in place, so the original stays auditable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    /// Clamped to `[0.2, 1.0]`
    pub difficulty: f64,
    pub objectives: Vec<Objective>,
    pub rewards: Vec<Reward>,
    pub time_limit_minutes: u32,
    /// Subject/focus pair the quest was generated from
    pub generated_from: String,
}

/// The student's preferred learning modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
}

impl Default for LearningStyle {
    fn default() -> Self {
        LearningStyle::Visual
    }
}

/// User preference nudging difficulty independent of performance signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeBias {
    Easier,
    Balanced,
    Harder,
}

impl Default for ChallengeBias {
    fn default() -> Self {
        ChallengeBias::Balanced
    }
}

/// Recent performance aggregates from the history layer.
///
/// Defaults to 0.7/0.7 so the engine never blocks on missing history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecentPerformance {
    pub completion_rate: f64,
    pub accuracy: f64,
}

impl Default for RecentPerformance {
    fn default() -> Self {
        Self {
            completion_rate: 0.7,
            accuracy: 0.7,
        }
    }
}

/// Upcoming academic commitments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcademicCalendar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_assessment: Option<String>,
    pub due_today: Vec<String>,
}

/// Learner preferences affecting category and difficulty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestPreferences {
    pub collaborators: Vec<String>,
    pub challenge_bias: ChallengeBias,
}

/// Everything the engine needs to generate one quest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationContext {
    pub user_id: String,
    pub subject: String,
    pub environment: EnvironmentScan,
    /// Current focus topic
    pub focus: String,
    pub available_minutes: u32,
    pub energy_level: f64,
    pub learning_style: LearningStyle,
    pub recent_performance: RecentPerformance,
    pub academic_calendar: AcademicCalendar,
    pub preferences: QuestPreferences,
}

impl GenerationContext {
    /// Fail fast on out-of-range primary inputs. Clamping applies only to
    /// internally derived values, never to caller-supplied garbage.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.available_minutes == 0 {
            return Err(EngineError::Validation(
                "available_minutes must be positive".to_string(),
            ));
        }
        ensure_unit_range("energy_level", self.energy_level)?;
        ensure_unit_range("completion_rate", self.recent_performance.completion_rate)?;
        ensure_unit_range("accuracy", self.recent_performance.accuracy)?;
        Ok(())
    }
}

/// Observed outcome of a completed (or abandoned) quest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuestOutcome {
    pub success: bool,
    pub accuracy: f64,
}

/// Output of one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub quest: Quest,
    pub category: QuestCategory,
    /// Human-readable explanation of the calibration. Observability only;
    /// never parsed by other components.
    pub adaptation_narrative: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ambient::TimeOfDay;
    use crate::context::scan::{Activity, Mood};

    fn scan() -> EnvironmentScan {
        EnvironmentScan {
            objects: vec![],
            people_count: 0,
            activity: Activity::Studying,
            mood: Mood::Balanced,
            intent: "complete coursework".into(),
            location: "library".into(),
            time_of_day: TimeOfDay::Afternoon,
            focus_level: 0.6,
            energy_level: 0.6,
            stress_level: 0.4,
            degraded: false,
        }
    }

    fn context() -> GenerationContext {
        GenerationContext {
            user_id: "u-1".into(),
            subject: "Algebra II".into(),
            environment: scan(),
            focus: "quadratics".into(),
            available_minutes: 30,
            energy_level: 0.5,
            learning_style: LearningStyle::default(),
            recent_performance: RecentPerformance::default(),
            academic_calendar: AcademicCalendar::default(),
            preferences: QuestPreferences::default(),
        }
    }

    #[test]
    fn test_validate_rejects_zero_minutes() {
        let mut ctx = context();
        ctx.available_minutes = 0;
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_scores() {
        let mut ctx = context();
        ctx.energy_level = 1.5;
        assert!(ctx.validate().is_err());

        let mut ctx = context();
        ctx.recent_performance.accuracy = -0.1;
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_default_performance_fallback() {
        let perf = RecentPerformance::default();
        assert_eq!(perf.completion_rate, 0.7);
        assert_eq!(perf.accuracy, 0.7);
    }
}
