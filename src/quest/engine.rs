//! Adaptive quest engine.
//!
//! Selects a quest archetype through an ordered rule chain, calibrates a
//! difficulty scalar, and expands a category template into objectives and
//! rewards. Generation is deterministic: resubmitting an identical
//! `GenerationContext` yields an identical `Quest` (ids included), which
//! makes upstream retries safe.

use crate::context::scan::Mood;
use crate::error::EngineError;
use crate::quest::types::{
    GenerationContext, GenerationResult, Objective, ObjectiveKind, Quest, QuestCategory,
    QuestOutcome, QuestType, Reward, RewardKind,
};
use uuid::Uuid;

/// Difficulty bounds for every generated quest.
const MIN_DIFFICULTY: f64 = 0.2;
const MAX_DIFFICULTY: f64 = 1.0;

struct CategoryRule {
    name: &'static str,
    outcome: QuestCategory,
    applies: fn(&GenerationContext) -> bool,
}

/// Category selection, first match wins. The trailing default is
/// `Foundation`.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "portfolio_focus",
        outcome: QuestCategory::Portfolio,
        applies: |ctx| {
            ctx.subject.to_lowercase().contains("essay") || ctx.focus.contains("portfolio")
        },
    },
    CategoryRule {
        name: "stressed_mood",
        outcome: QuestCategory::Wellness,
        applies: |ctx| ctx.environment.mood == Mood::Stressed,
    },
    CategoryRule {
        name: "low_accuracy",
        outcome: QuestCategory::Foundation,
        applies: |ctx| ctx.recent_performance.accuracy < 0.65,
    },
    CategoryRule {
        name: "high_completion_long_window",
        outcome: QuestCategory::Acceleration,
        applies: |ctx| {
            ctx.recent_performance.completion_rate > 0.85 && ctx.available_minutes >= 45
        },
    },
    CategoryRule {
        name: "collaborators_available",
        outcome: QuestCategory::Social,
        applies: |ctx| !ctx.preferences.collaborators.is_empty(),
    },
];

/// Generates quests calibrated to the student's current state.
///
/// Stateless; every call is a pure function of its context.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveQuestEngine;

impl AdaptiveQuestEngine {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the quest category through the ordered rule chain.
    pub fn compute_category(&self, ctx: &GenerationContext) -> QuestCategory {
        for rule in CATEGORY_RULES {
            if (rule.applies)(ctx) {
                tracing::debug!(rule = rule.name, outcome = ?rule.outcome, "category rule matched");
                return rule.outcome;
            }
        }
        QuestCategory::Foundation
    }

    /// Generate a quest from the given context.
    pub fn generate(&self, ctx: &GenerationContext) -> Result<GenerationResult, EngineError> {
        ctx.validate()?;

        let category = self.compute_category(ctx);
        let difficulty = self.adapt_difficulty(category, ctx);
        let seed = context_seed(ctx, category);
        let objectives = self.create_objectives(category, ctx, difficulty, &seed);

        let quest = Quest {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()),
            title: self.build_title(category, ctx),
            description: self.build_description(category, ctx),
            quest_type: resolve_quest_type(category),
            difficulty,
            objectives,
            rewards: self.build_rewards(category),
            time_limit_minutes: self.estimate_time_limit(category, ctx),
            generated_from: format!("{}-{}", ctx.subject, ctx.focus),
        };

        tracing::debug!(
            quest_id = %quest.id,
            category = category.as_str(),
            difficulty,
            "quest generated"
        );

        Ok(GenerationResult {
            quest,
            category,
            adaptation_narrative: self.describe_adaptation(category, ctx, difficulty),
        })
    }

    /// Re-calibrate a quest from its observed outcome, producing a new
    /// `Quest` value. Any outcome other than a failure or a high-accuracy
    /// success leaves the quest unchanged.
    pub fn recalibrate(&self, quest: &Quest, outcome: &QuestOutcome) -> Quest {
        let mut updated = quest.clone();
        if !outcome.success {
            updated.difficulty = round2((quest.difficulty - 0.1).max(MIN_DIFFICULTY));
            updated.objectives = quest
                .objectives
                .iter()
                .map(|o| Objective {
                    quantity: ((o.quantity as f64 * 0.75).round() as u32).max(1),
                    ..o.clone()
                })
                .collect();
        } else if outcome.accuracy > 0.9 {
            updated.difficulty = round2((quest.difficulty + 0.1).min(MAX_DIFFICULTY));
            updated.objectives = quest
                .objectives
                .iter()
                .map(|o| Objective {
                    quantity: (o.quantity as f64 * 1.2).round() as u32,
                    ..o.clone()
                })
                .collect();
        }
        updated
    }

    fn adapt_difficulty(&self, category: QuestCategory, ctx: &GenerationContext) -> f64 {
        let base = base_difficulty(category);
        let energy_modifier = if ctx.energy_level > 0.7 {
            0.1
        } else if ctx.energy_level < 0.4 {
            -0.1
        } else {
            0.0
        };
        let preference_modifier = match ctx.preferences.challenge_bias {
            crate::quest::types::ChallengeBias::Harder => 0.1,
            crate::quest::types::ChallengeBias::Easier => -0.1,
            crate::quest::types::ChallengeBias::Balanced => 0.0,
        };
        let accuracy_modifier = if ctx.recent_performance.accuracy < 0.6 {
            -0.15
        } else {
            0.0
        };

        round2(
            (base + energy_modifier + preference_modifier + accuracy_modifier)
                .clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
        )
    }

    fn create_objectives(
        &self,
        category: QuestCategory,
        ctx: &GenerationContext,
        difficulty: f64,
        seed: &str,
    ) -> Vec<Objective> {
        let volume = ((ctx.available_minutes as f64 / 15.0) * (difficulty + 0.5))
            .round()
            .max(2.0) as u32;

        let templates: Vec<(String, ObjectiveKind, u32)> = match category {
            QuestCategory::Foundation => vec![
                (
                    format!(
                        "Work through {volume} practice problems focusing on {}.",
                        ctx.focus
                    ),
                    ObjectiveKind::Action,
                    volume,
                ),
                (
                    "Reflect on two problem-solving strategies that felt effective.".to_string(),
                    ObjectiveKind::Reflect,
                    2,
                ),
            ],
            QuestCategory::Acceleration => vec![
                (
                    format!("Create a challenge set of {volume} advanced items to teach a peer."),
                    ObjectiveKind::Create,
                    volume,
                ),
                (
                    "Record a 90-second walkthrough explaining your reasoning.".to_string(),
                    ObjectiveKind::Create,
                    1,
                ),
            ],
            QuestCategory::Wellness => vec![
                (
                    "Complete a guided breathing exercise with 5 deep cycles.".to_string(),
                    ObjectiveKind::Action,
                    5,
                ),
                (
                    "Journal one sentence about what went well today.".to_string(),
                    ObjectiveKind::Reflect,
                    1,
                ),
            ],
            QuestCategory::Social => {
                let partners = if ctx.preferences.collaborators.is_empty() {
                    "a peer".to_string()
                } else {
                    ctx.preferences.collaborators.join(", ")
                };
                vec![
                    (
                        format!("Coordinate a 20-minute co-working sprint with {partners}."),
                        ObjectiveKind::Action,
                        1,
                    ),
                    (
                        "Exchange feedback highlights with your teammate.".to_string(),
                        ObjectiveKind::Collect,
                        2,
                    ),
                ]
            }
            QuestCategory::Portfolio => vec![
                (
                    format!("Draft {volume} impactful sentences for your portfolio artifact."),
                    ObjectiveKind::Create,
                    volume,
                ),
                (
                    "Gather two multimedia references to elevate the piece.".to_string(),
                    ObjectiveKind::Collect,
                    2,
                ),
            ],
        };

        templates
            .into_iter()
            .enumerate()
            .map(|(index, (description, kind, quantity))| Objective {
                id: Uuid::new_v5(
                    &Uuid::NAMESPACE_OID,
                    format!("{seed}:objective:{index}").as_bytes(),
                ),
                description,
                kind,
                quantity: quantity.max(1),
                completed: false,
            })
            .collect()
    }

    fn build_rewards(&self, category: QuestCategory) -> Vec<Reward> {
        if category == QuestCategory::Wellness {
            return vec![
                Reward::new(RewardKind::Xp, 40, "Calm XP"),
                Reward::new(RewardKind::Tokens, 10, "Focus Tokens"),
            ];
        }
        vec![
            Reward::new(RewardKind::Xp, 75, "Core XP"),
            Reward::new(RewardKind::Tokens, 15, "Verse Tokens"),
        ]
    }

    fn estimate_time_limit(&self, category: QuestCategory, ctx: &GenerationContext) -> u32 {
        if category == QuestCategory::Wellness {
            return 10;
        }
        ctx.available_minutes.clamp(20, 90)
    }

    fn build_title(&self, category: QuestCategory, ctx: &GenerationContext) -> String {
        match category {
            QuestCategory::Foundation => format!("{} Foundation Builder", ctx.subject),
            QuestCategory::Acceleration => format!("{} Vanguard Sprint", ctx.subject),
            QuestCategory::Social => format!("{} Collaboration Charge", ctx.subject),
            QuestCategory::Wellness => "Reset & Refocus Ritual".to_string(),
            QuestCategory::Portfolio => format!("{} Portfolio Forge", ctx.subject),
        }
    }

    fn build_description(&self, category: QuestCategory, ctx: &GenerationContext) -> String {
        let due_today = if ctx.academic_calendar.due_today.is_empty() {
            "No urgent deadlines.".to_string()
        } else {
            format!("Due today: {}.", ctx.academic_calendar.due_today.join(", "))
        };
        let closer = if category == QuestCategory::Wellness {
            "Re-center so you can push again tonight."
        } else {
            "Push mastery with intentional reps."
        };
        format!("{due_today} Focus: {}. {closer}", ctx.focus)
    }

    fn describe_adaptation(
        &self,
        category: QuestCategory,
        ctx: &GenerationContext,
        difficulty: f64,
    ) -> String {
        let mut signals = vec![
            format!(
                "Difficulty calibrated to {}% intensity",
                (difficulty * 100.0).round() as i64
            ),
            format!("Energy level {}%", (ctx.energy_level * 100.0).round() as i64),
            format!(
                "Recent accuracy {}%",
                (ctx.recent_performance.accuracy * 100.0).round() as i64
            ),
        ];
        if !ctx.preferences.collaborators.is_empty() {
            signals.push(format!(
                "Collaboration with {}",
                ctx.preferences.collaborators.join(", ")
            ));
        }
        if let Some(assessment) = &ctx.academic_calendar.next_assessment {
            signals.push(format!("Next assessment: {assessment}"));
        }
        format!("{} quest tuned via {}", category.as_str(), signals.join(" | "))
    }
}

fn base_difficulty(category: QuestCategory) -> f64 {
    match category {
        QuestCategory::Foundation => 0.4,
        QuestCategory::Acceleration => 0.7,
        QuestCategory::Wellness => 0.3,
        QuestCategory::Social => 0.5,
        QuestCategory::Portfolio => 0.6,
    }
}

fn resolve_quest_type(category: QuestCategory) -> QuestType {
    match category {
        QuestCategory::Wellness => QuestType::Wellness,
        QuestCategory::Social => QuestType::Social,
        QuestCategory::Acceleration | QuestCategory::Foundation => QuestType::Learning,
        QuestCategory::Portfolio => QuestType::Focus,
    }
}

/// Deterministic fingerprint of a generation context, used to derive quest
/// and objective ids via uuid v5.
fn context_seed(ctx: &GenerationContext, category: QuestCategory) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        ctx.user_id,
        ctx.subject,
        ctx.focus,
        ctx.available_minutes,
        ctx.energy_level,
        category.as_str()
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
