//! Environment context analyzer.
//!
//! Fuses a normalized `DetectionSet` with ambient signals into an
//! `EnvironmentScan` plus zero or more `InterventionSignal`s. Pure function
//! of its inputs aside from a one-time, idempotent model warm-up that must
//! complete before the first analysis.

use crate::context::ambient::{AmbientContext, TimeOfDay};
use crate::context::scan::{
    Activity, EnvironmentScan, InterventionSignal, Mood, SignalPriority,
};
use crate::detection::types::{DetectionSet, ObjectRole};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Noise level assumed when no reading is available, in dB.
const DEFAULT_NOISE_DB: f64 = 40.0;

/// Stress contribution assumed when heart rate is unavailable.
const DEFAULT_HEART_STRESS: f64 = 0.2;

/// Stress contribution assumed when noise is unavailable.
const DEFAULT_NOISE_STRESS: f64 = 0.2;

/// Energy baseline assumed when heart rate is unavailable.
const DEFAULT_ENERGY_BASE: f64 = 0.6;

/// Heart rate above which a focus penalty applies, in bpm.
const FOCUS_PENALTY_HR: f64 = 110.0;

/// Ambient noise above which a scene reads as social, in dB.
const SOCIAL_NOISE_DB: f64 = 65.0;

/// Boxed warm-up future, so the trait stays object-safe on older toolchains.
pub type WarmupFuture<'a> = Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + 'a>>;

/// One-time preparation of the upstream detection models.
///
/// Implementations load/compile whatever the vision stack needs. The
/// analyzer guarantees `warm_up` is awaited at most once concurrently and
/// retried lazily after a failure.
pub trait ModelWarmup: Send + Sync {
    fn warm_up(&self) -> WarmupFuture<'_>;
}

/// Warm-up that completes immediately. Used when detections are produced
/// out of process and arrive pre-normalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWarmup;

impl ModelWarmup for NoopWarmup {
    fn warm_up(&self) -> WarmupFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

/// Result of one analysis pass: the scan and its intervention signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scan: EnvironmentScan,
    pub interventions: Vec<InterventionSignal>,
}

/// Cues feeding the ordered activity rule chain.
struct ActivityCues {
    in_transit: bool,
    people_count: usize,
    has_distraction: bool,
    has_study_tool: bool,
    noisy: bool,
}

struct ActivityRule {
    name: &'static str,
    outcome: Activity,
    applies: fn(&ActivityCues) -> bool,
}

/// Activity classification, first match wins.
const ACTIVITY_RULES: &[ActivityRule] = &[
    ActivityRule {
        name: "transit_location",
        outcome: Activity::Commuting,
        applies: |c| c.in_transit,
    },
    ActivityRule {
        name: "group_with_distraction",
        outcome: Activity::Socializing,
        applies: |c| c.people_count > 1 && c.has_distraction,
    },
    ActivityRule {
        name: "study_tool_present",
        outcome: Activity::Studying,
        applies: |c| c.has_study_tool,
    },
    ActivityRule {
        name: "loud_ambient",
        outcome: Activity::Socializing,
        applies: |c| c.noisy,
    },
];

/// Fuses detections and ambient signals into a situational assessment.
///
/// Stateless across calls; safe to share behind an `Arc` and invoke
/// concurrently.
pub struct EnvironmentContextAnalyzer {
    warmup: Arc<dyn ModelWarmup>,
    ready: OnceCell<()>,
}

impl EnvironmentContextAnalyzer {
    pub fn new(warmup: Arc<dyn ModelWarmup>) -> Self {
        Self {
            warmup,
            ready: OnceCell::new(),
        }
    }

    /// Analyzer for pre-normalized detections that need no model warm-up.
    pub fn without_models() -> Self {
        Self::new(Arc::new(NoopWarmup))
    }

    /// Await the shared warm-up. Concurrent callers block on the single
    /// in-flight future; a failed warm-up leaves the cell empty so the
    /// next call retries instead of poisoning the analyzer.
    async fn ensure_ready(&self) -> Result<(), EngineError> {
        self.ready
            .get_or_try_init(|| async {
                self.warmup.warm_up().await.map_err(|e| {
                    tracing::error!(error = %e, "model warm-up failed");
                    match e {
                        EngineError::ModelUnavailable(_) => e,
                        other => EngineError::ModelUnavailable(other.to_string()),
                    }
                })
            })
            .await
            .map(|_| ())
    }

    /// Analyze one detection pass against its ambient context.
    pub async fn analyze(
        &self,
        detections: &DetectionSet,
        ambient: &AmbientContext,
    ) -> Result<AnalysisResult, EngineError> {
        ambient.validate()?;
        self.ensure_ready().await?;

        let people_count = detections.people_count();
        let focus_level = self.focus_level(detections, ambient);
        let stress_level = self.stress_level(ambient, focus_level);
        let energy_level = self.energy_level(ambient);
        let activity = self.classify_activity(detections, ambient);
        let mood = estimate_mood(stress_level, focus_level);
        let degraded = detections.face_confidences.is_empty() || ambient.is_sparse();

        if degraded {
            tracing::warn!(
                faces = people_count,
                sparse_ambient = ambient.is_sparse(),
                "sparse inputs, scores use fallback estimates"
            );
        }

        let scan = EnvironmentScan {
            objects: detections.objects.clone(),
            people_count,
            activity,
            mood,
            intent: self.predict_intent(detections, ambient),
            location: ambient.location.clone(),
            time_of_day: ambient.time_of_day,
            focus_level,
            energy_level,
            stress_level,
            degraded,
        };

        let interventions = self.generate_interventions(&scan);
        tracing::debug!(
            ?activity,
            ?mood,
            focus = focus_level,
            stress = stress_level,
            energy = energy_level,
            signals = interventions.len(),
            "environment scan complete"
        );

        Ok(AnalysisResult {
            scan,
            interventions,
        })
    }

    fn classify_activity(&self, detections: &DetectionSet, ambient: &AmbientContext) -> Activity {
        let cues = ActivityCues {
            in_transit: ambient.location.contains("bus") || ambient.location.contains("train"),
            people_count: detections.people_count(),
            has_distraction: detections.has_role(ObjectRole::Distraction),
            has_study_tool: detections.has_role(ObjectRole::StudyTool),
            noisy: ambient.ambient_noise_db.is_some_and(|db| db > SOCIAL_NOISE_DB),
        };

        for rule in ACTIVITY_RULES {
            if (rule.applies)(&cues) {
                tracing::debug!(rule = rule.name, outcome = ?rule.outcome, "activity rule matched");
                return rule.outcome;
            }
        }
        Activity::Unknown
    }

    /// Focus from face confidences; falls back to a noise-only estimate
    /// when no faces are visible.
    fn focus_level(&self, detections: &DetectionSet, ambient: &AmbientContext) -> f64 {
        let faces = &detections.face_confidences;
        if faces.is_empty() {
            let noise = ambient.ambient_noise_db.unwrap_or(DEFAULT_NOISE_DB);
            return round2((1.0 - noise / 100.0).max(0.2));
        }

        let avg_confidence = faces.iter().sum::<f64>() / faces.len() as f64;
        // The 1.2 divisor is a tuned constant carried over from the
        // calibration data; treated as a literal behavioral contract.
        let baseline = avg_confidence / 1.2;
        let heart_rate_penalty = if ambient.heart_rate.is_some_and(|hr| hr > FOCUS_PENALTY_HR) {
            0.15
        } else {
            0.0
        };
        round2((baseline - heart_rate_penalty).clamp(0.0, 1.0))
    }

    /// Weighted stress estimate over heart rate, noise, recent events, and
    /// focus deficit.
    fn stress_level(&self, ambient: &AmbientContext, focus_level: f64) -> f64 {
        let heart_stress = ambient
            .heart_rate
            .map(|hr| ((hr - 70.0) / 60.0).max(0.0))
            .unwrap_or(DEFAULT_HEART_STRESS);
        let noise_stress = ambient
            .ambient_noise_db
            .map(|db| (db / 100.0).min(1.0))
            .unwrap_or(DEFAULT_NOISE_STRESS);
        let event_stress = ambient
            .recent_stress_events
            .map(|n| (n as f64 / 3.0).min(1.0))
            .unwrap_or(0.0);
        let focus_deficit = 1.0 - focus_level;

        let stress = 0.25
            + heart_stress * 0.35
            + noise_stress * 0.25
            + event_stress * 0.15
            + focus_deficit * 0.2;
        round2(stress.clamp(0.0, 1.0))
    }

    fn energy_level(&self, ambient: &AmbientContext) -> f64 {
        let base = ambient
            .heart_rate
            .map(|hr| (hr / 120.0).min(1.0))
            .unwrap_or(DEFAULT_ENERGY_BASE);
        let time_bonus = match ambient.time_of_day {
            TimeOfDay::Morning => 0.1,
            TimeOfDay::Evening => -0.1,
            _ => 0.0,
        };
        round2((base + time_bonus).clamp(0.0, 1.0))
    }

    fn predict_intent(&self, detections: &DetectionSet, ambient: &AmbientContext) -> String {
        if detections.has_role(ObjectRole::StudyTool) {
            return ambient
                .schedule_focus
                .clone()
                .unwrap_or_else(|| "complete coursework".to_string());
        }
        if ambient.location.contains("cafeteria") {
            return "social recharge".to_string();
        }
        if ambient.time_of_day == TimeOfDay::Night {
            return "rest and recovery".to_string();
        }
        "explore interests".to_string()
    }

    /// Independent intervention checks; any subset may fire.
    fn generate_interventions(&self, scan: &EnvironmentScan) -> Vec<InterventionSignal> {
        let mut signals = Vec::new();
        if scan.focus_level < 0.5 {
            signals.push(InterventionSignal {
                trigger: "low_focus".to_string(),
                priority: SignalPriority::Medium,
                message: "Focus slip detected. Activate a 10-minute Deep Focus burst?".to_string(),
            });
        }
        if scan.stress_level > 0.65 {
            signals.push(InterventionSignal {
                trigger: "high_stress".to_string(),
                priority: SignalPriority::High,
                message: "Stress spikes detected. Launch a 3-minute breathing quest now."
                    .to_string(),
            });
        }
        if scan.activity == Activity::Commuting {
            signals.push(InterventionSignal {
                trigger: "commute_window".to_string(),
                priority: SignalPriority::Low,
                message: "Commute unlocked: queue today's micro-lesson playlist?".to_string(),
            });
        }
        signals
    }
}

/// Mood ladder, evaluated in order.
fn estimate_mood(stress: f64, focus: f64) -> Mood {
    if stress > 0.7 {
        Mood::Stressed
    } else if focus > 0.7 {
        Mood::Focused
    } else if stress > 0.5 {
        Mood::Frustrated
    } else if focus < 0.4 {
        Mood::Distracted
    } else {
        Mood::Balanced
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::types::{DetectedObject, ObjectRole, Rect};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn object(label: &str) -> DetectedObject {
        DetectedObject {
            label: label.into(),
            confidence: 0.9,
            bounds: Rect::default(),
            role: ObjectRole::from_label(label),
        }
    }

    fn ambient(location: &str, time_of_day: TimeOfDay) -> AmbientContext {
        AmbientContext::new(location, time_of_day)
    }

    struct FailingWarmup {
        attempts: AtomicU32,
        fail_first: u32,
    }

    impl ModelWarmup for FailingWarmup {
        fn warm_up(&self) -> WarmupFuture<'_> {
            Box::pin(async {
                let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
                if attempt < self.fail_first {
                    Err(EngineError::ModelUnavailable("load failed".into()))
                } else {
                    Ok(())
                }
            })
        }
    }

    #[tokio::test]
    async fn test_scores_always_in_unit_range() {
        let analyzer = EnvironmentContextAnalyzer::without_models();
        let mut ctx = ambient("library", TimeOfDay::Morning);
        ctx.heart_rate = Some(190.0);
        ctx.ambient_noise_db = Some(95.0);
        ctx.recent_stress_events = Some(9);

        let result = analyzer
            .analyze(&DetectionSet::default(), &ctx)
            .await
            .unwrap();
        let scan = result.scan;
        assert!((0.0..=1.0).contains(&scan.focus_level));
        assert!((0.0..=1.0).contains(&scan.energy_level));
        assert!((0.0..=1.0).contains(&scan.stress_level));
    }

    #[tokio::test]
    async fn test_zero_detections_still_scores() {
        let analyzer = EnvironmentContextAnalyzer::without_models();
        let ctx = ambient("dorm room", TimeOfDay::Afternoon);

        let result = analyzer
            .analyze(&DetectionSet::default(), &ctx)
            .await
            .unwrap();
        // No faces, no noise reading: noise-only fallback at 40 dB
        assert_eq!(result.scan.focus_level, 0.6);
        assert!(result.scan.degraded);
    }

    #[tokio::test]
    async fn test_focus_from_faces_with_heart_rate_penalty() {
        let analyzer = EnvironmentContextAnalyzer::without_models();
        let detections = DetectionSet {
            objects: vec![],
            face_confidences: vec![0.9, 0.96],
        };
        let mut ctx = ambient("library", TimeOfDay::Afternoon);
        ctx.heart_rate = Some(120.0);
        ctx.ambient_noise_db = Some(40.0);
        ctx.recent_stress_events = Some(0);

        let result = analyzer.analyze(&detections, &ctx).await.unwrap();
        // avg 0.93 / 1.2 = 0.775, minus 0.15 penalty = 0.625 -> 0.63
        assert_eq!(result.scan.focus_level, 0.63);
        assert!(!result.scan.degraded);
    }

    #[tokio::test]
    async fn test_activity_rule_precedence() {
        let analyzer = EnvironmentContextAnalyzer::without_models();

        // Transit beats everything
        let detections = DetectionSet {
            objects: vec![object("book")],
            face_confidences: vec![0.9],
        };
        let result = analyzer
            .analyze(&detections, &ambient("bus stop", TimeOfDay::Morning))
            .await
            .unwrap();
        assert_eq!(result.scan.activity, Activity::Commuting);

        // Group + distraction beats study tools
        let detections = DetectionSet {
            objects: vec![object("book"), object("television")],
            face_confidences: vec![0.9, 0.8],
        };
        let result = analyzer
            .analyze(&detections, &ambient("common room", TimeOfDay::Evening))
            .await
            .unwrap();
        assert_eq!(result.scan.activity, Activity::Socializing);

        // Study tool alone
        let detections = DetectionSet {
            objects: vec![object("laptop")],
            face_confidences: vec![0.9],
        };
        let result = analyzer
            .analyze(&detections, &ambient("library", TimeOfDay::Morning))
            .await
            .unwrap();
        assert_eq!(result.scan.activity, Activity::Studying);

        // Loud ambient with nothing detected
        let mut ctx = ambient("hallway", TimeOfDay::Afternoon);
        ctx.ambient_noise_db = Some(70.0);
        let result = analyzer
            .analyze(&DetectionSet::default(), &ctx)
            .await
            .unwrap();
        assert_eq!(result.scan.activity, Activity::Socializing);

        // Nothing matches
        let result = analyzer
            .analyze(&DetectionSet::default(), &ambient("park", TimeOfDay::Afternoon))
            .await
            .unwrap();
        assert_eq!(result.scan.activity, Activity::Unknown);
    }

    #[tokio::test]
    async fn test_high_stress_scenario_fires_high_priority_signal() {
        let analyzer = EnvironmentContextAnalyzer::without_models();
        let mut ctx = ambient("exam hall", TimeOfDay::Afternoon);
        ctx.heart_rate = Some(130.0);
        ctx.ambient_noise_db = Some(70.0);
        ctx.recent_stress_events = Some(2);

        let result = analyzer
            .analyze(&DetectionSet::default(), &ctx)
            .await
            .unwrap();
        assert!(result.scan.stress_level > 0.6);
        assert!(result
            .interventions
            .iter()
            .any(|s| s.priority == SignalPriority::High));
    }

    #[tokio::test]
    async fn test_commute_signal_fires() {
        let analyzer = EnvironmentContextAnalyzer::without_models();
        let ctx = ambient("train platform", TimeOfDay::Morning);

        let result = analyzer
            .analyze(&DetectionSet::default(), &ctx)
            .await
            .unwrap();
        assert_eq!(result.scan.activity, Activity::Commuting);
        assert!(result
            .interventions
            .iter()
            .any(|s| s.trigger == "commute_window"));
    }

    #[tokio::test]
    async fn test_intent_prefers_schedule_focus() {
        let analyzer = EnvironmentContextAnalyzer::without_models();
        let detections = DetectionSet {
            objects: vec![object("notebook")],
            face_confidences: vec![0.9],
        };
        let mut ctx = ambient("library", TimeOfDay::Morning);
        ctx.schedule_focus = Some("Chemistry lab prep".into());

        let result = analyzer.analyze(&detections, &ctx).await.unwrap();
        assert_eq!(result.scan.intent, "Chemistry lab prep");
    }

    #[tokio::test]
    async fn test_warmup_failure_propagates_and_retries() {
        let warmup = Arc::new(FailingWarmup {
            attempts: AtomicU32::new(0),
            fail_first: 1,
        });
        let analyzer = EnvironmentContextAnalyzer::new(warmup.clone());
        let ctx = ambient("library", TimeOfDay::Morning);

        let first = analyzer.analyze(&DetectionSet::default(), &ctx).await;
        assert!(matches!(first, Err(EngineError::ModelUnavailable(_))));

        // Next call retries warm-up lazily and succeeds
        let second = analyzer.analyze(&DetectionSet::default(), &ctx).await;
        assert!(second.is_ok());
        assert_eq!(warmup.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_warmup_runs_once_on_success() {
        let warmup = Arc::new(FailingWarmup {
            attempts: AtomicU32::new(0),
            fail_first: 0,
        });
        let analyzer = EnvironmentContextAnalyzer::new(warmup.clone());
        let ctx = ambient("library", TimeOfDay::Morning);

        for _ in 0..3 {
            analyzer
                .analyze(&DetectionSet::default(), &ctx)
                .await
                .unwrap();
        }
        assert_eq!(warmup.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mood_ladder() {
        assert_eq!(estimate_mood(0.8, 0.9), Mood::Stressed);
        assert_eq!(estimate_mood(0.3, 0.8), Mood::Focused);
        assert_eq!(estimate_mood(0.6, 0.5), Mood::Frustrated);
        assert_eq!(estimate_mood(0.3, 0.3), Mood::Distracted);
        assert_eq!(estimate_mood(0.3, 0.5), Mood::Balanced);
    }

    #[tokio::test]
    async fn test_invalid_ambient_rejected() {
        let analyzer = EnvironmentContextAnalyzer::without_models();
        let mut ctx = ambient("library", TimeOfDay::Morning);
        ctx.heart_rate = Some(-10.0);

        let result = analyzer.analyze(&DetectionSet::default(), &ctx).await;
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }
}
