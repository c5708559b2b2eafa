//! Longitudinal risk scoring and counseling intervention scheduling.
//!
//! Aggregates completion rates, stress logs, and absenteeism proxies into a
//! `RiskSignal`, then maps it to a prioritized, scheduled `Intervention`
//! with a matched support resource. No internal state; every call is
//! reproducible from its inputs.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Fallback risk levels when no history is available.
const DEFAULT_ACADEMIC_RISK: f64 = 0.35;
const DEFAULT_STRESS_RISK: f64 = 0.25;
const DEFAULT_ABSENTEEISM_RISK: f64 = 0.15;

/// Stress events per week that saturate the stress risk.
const STRESS_EVENT_CEILING: f64 = 6.0;

/// Absences per month that saturate the absenteeism risk.
const ABSENCE_CEILING: f64 = 8.0;

/// Intervention priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Longitudinal history supplied by the persistence layer. All fields are
/// optional; missing aggregates fall back to engine-defined defaults so
/// scoring never blocks on absent history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskHistory {
    pub user_id: String,
    /// Quest/assignment completion rate in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,
    /// Average answer accuracy in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_accuracy: Option<f64>,
    /// Stress events logged over the last week
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_events_last_week: Option<u32>,
    /// Absences over the last month
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absences_last_month: Option<u32>,
}

/// Aggregated risk assessment for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSignal {
    pub user_id: String,
    pub academic_risk: f64,
    pub stress_risk: f64,
    pub absenteeism_risk: f64,
    /// Display-ready trend summary
    pub narrative: String,
}

/// A scheduled, prioritized human-facing action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    pub user_id: String,
    pub priority: Priority,
    pub scheduled_at: DateTime<Utc>,
    pub resource_id: String,
    pub notes: String,
}

/// A support resource with an activation threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportResource {
    pub id: String,
    /// Minimum `max(academic_risk, stress_risk)` at which this resource
    /// applies
    pub threshold: f64,
    pub notes: String,
}

struct PriorityRule {
    name: &'static str,
    outcome: Priority,
    applies: fn(&RiskSignal) -> bool,
}

/// Priority ladder, first match wins; falls through to `Low`.
const PRIORITY_RULES: &[PriorityRule] = &[
    PriorityRule {
        name: "acute_risk",
        outcome: Priority::High,
        applies: |s| s.academic_risk > 0.7 || s.stress_risk > 0.75,
    },
    PriorityRule {
        name: "elevated_risk",
        outcome: Priority::Medium,
        applies: |s| s.academic_risk > 0.5 || s.stress_risk > 0.55,
    },
];

/// Scores longitudinal risk and schedules counseling interventions.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    resources: Vec<SupportResource>,
}

impl RiskScorer {
    pub fn new(resources: Vec<SupportResource>) -> Self {
        Self { resources }
    }

    /// Aggregate history into a risk signal. Components with no backing
    /// history use the default fallback levels.
    pub fn evaluate_risk(&self, history: &RiskHistory) -> RiskSignal {
        let academic_risk = match (history.completion_rate, history.average_accuracy) {
            (Some(completion), Some(accuracy)) => {
                round2((1.0 - (completion * 0.55 + accuracy * 0.45)).clamp(0.0, 1.0))
            }
            (Some(completion), None) => round2((1.0 - completion).clamp(0.0, 1.0)),
            (None, Some(accuracy)) => round2((1.0 - accuracy).clamp(0.0, 1.0)),
            (None, None) => DEFAULT_ACADEMIC_RISK,
        };
        let stress_risk = history
            .stress_events_last_week
            .map(|n| round2((n as f64 / STRESS_EVENT_CEILING).min(1.0)))
            .unwrap_or(DEFAULT_STRESS_RISK);
        let absenteeism_risk = history
            .absences_last_month
            .map(|n| round2((n as f64 / ABSENCE_CEILING).min(1.0)))
            .unwrap_or(DEFAULT_ABSENTEEISM_RISK);

        let narrative = format!(
            "Academic {}%, Stress {}%, Attendance {}%.",
            (academic_risk * 100.0).round() as i64,
            (stress_risk * 100.0).round() as i64,
            (absenteeism_risk * 100.0).round() as i64
        );

        tracing::debug!(
            user_id = %history.user_id,
            academic_risk,
            stress_risk,
            absenteeism_risk,
            "risk evaluated"
        );

        RiskSignal {
            user_id: history.user_id.clone(),
            academic_risk,
            stress_risk,
            absenteeism_risk,
            narrative,
        }
    }

    /// Schedule an intervention for the given signal at the current time.
    pub fn schedule_intervention(&self, signal: &RiskSignal) -> Intervention {
        self.schedule_intervention_at(signal, Utc::now())
    }

    /// Schedule an intervention relative to an explicit `now`. The window
    /// is a deterministic function of priority alone.
    pub fn schedule_intervention_at(
        &self,
        signal: &RiskSignal,
        now: DateTime<Utc>,
    ) -> Intervention {
        let priority = resolve_priority(signal);
        let scheduled_at = schedule_window(priority, now);
        let (resource_id, notes) = self.match_resource(signal, priority);

        tracing::info!(
            user_id = %signal.user_id,
            ?priority,
            %scheduled_at,
            resource = %resource_id,
            "intervention scheduled"
        );

        Intervention {
            user_id: signal.user_id.clone(),
            priority,
            scheduled_at,
            resource_id,
            notes,
        }
    }

    /// Highest-threshold resource whose threshold the risk level reaches;
    /// priority-specific fallback when none qualifies.
    fn match_resource(&self, signal: &RiskSignal, priority: Priority) -> (String, String) {
        let level = signal.academic_risk.max(signal.stress_risk);
        let matched = self
            .resources
            .iter()
            .filter(|r| r.threshold <= level)
            .max_by(|a, b| a.threshold.total_cmp(&b.threshold));

        if let Some(resource) = matched {
            return (resource.id.clone(), resource.notes.clone());
        }

        if priority == Priority::High {
            (
                "tutor-emergency".to_string(),
                "Immediate tutoring with mentor-on-call.".to_string(),
            )
        } else {
            (
                "coach-checkin".to_string(),
                "Schedule wellness coach check-in.".to_string(),
            )
        }
    }
}

fn resolve_priority(signal: &RiskSignal) -> Priority {
    for rule in PRIORITY_RULES {
        if (rule.applies)(signal) {
            tracing::debug!(rule = rule.name, outcome = ?rule.outcome, "priority rule matched");
            return rule.outcome;
        }
    }
    Priority::Low
}

/// High: now + 2h. Medium: next day 10:00. Low: now + 3 days 14:00.
fn schedule_window(priority: Priority, now: DateTime<Utc>) -> DateTime<Utc> {
    match priority {
        Priority::High => now + Duration::hours(2),
        Priority::Medium => at_hour(now + Duration::days(1), 10),
        Priority::Low => at_hour(now + Duration::days(3), 14),
    }
}

fn at_hour(day: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    day.with_hour(hour)
        .and_then(|d| d.with_minute(0))
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(day)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
