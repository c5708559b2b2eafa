//! Procedural quest generation calibrated to the student's current state.

pub mod engine;
pub mod types;

pub use engine::AdaptiveQuestEngine;
pub use types::{
    AcademicCalendar, ChallengeBias, GenerationContext, GenerationResult, LearningStyle,
    Objective, ObjectiveKind, Quest, QuestCategory, QuestOutcome, QuestPreferences, QuestType,
    RecentPerformance, Reward, RewardKind,
};
