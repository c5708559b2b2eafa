//! End-to-end tests for the full assessment pipeline:
//! raw detections -> scan -> quest -> risk -> snapshot.

use lenscore::{
    context::{AmbientContext, EnvironmentContextAnalyzer, SignalPriority, TimeOfDay},
    detection::{DetectionAdapter, RawDetections, RawPrediction},
    quest::{
        AcademicCalendar, AdaptiveQuestEngine, ChallengeBias, GenerationContext, LearningStyle,
        QuestCategory, QuestOutcome, QuestPreferences, RecentPerformance,
    },
    risk::{Priority, RiskHistory, RiskScorer},
    snapshot::SnapshotBuilder,
    AssessmentSnapshot, EngineError,
};

fn raw_detections() -> RawDetections {
    RawDetections {
        predictions: vec![
            RawPrediction {
                label: "book".into(),
                score: 0.91,
                bbox: [12.0, 30.0, 140.0, 90.0],
            },
            RawPrediction {
                label: "laptop".into(),
                score: 0.87,
                bbox: [200.0, 60.0, 320.0, 210.0],
            },
        ],
        face_scores: vec![0.9],
    }
}

fn ambient_library() -> AmbientContext {
    let mut ambient = AmbientContext::new("school library", TimeOfDay::Morning);
    ambient.ambient_noise_db = Some(42.0);
    ambient.heart_rate = Some(74.0);
    ambient.recent_stress_events = Some(0);
    ambient.schedule_focus = Some("Algebra II".into());
    ambient
}

#[tokio::test]
async fn full_pipeline_produces_serializable_snapshot() {
    let adapter = DetectionAdapter::new();
    let analyzer = EnvironmentContextAnalyzer::without_models();
    let engine = AdaptiveQuestEngine::new();

    let detections = adapter.normalize(&raw_detections()).unwrap();
    let analysis = analyzer
        .analyze(&detections, &ambient_library())
        .await
        .unwrap();

    assert!(!analysis.scan.degraded);

    let ctx = GenerationContext {
        user_id: "student-7".into(),
        subject: "Algebra II".into(),
        environment: analysis.scan.clone(),
        focus: "quadratics".into(),
        available_minutes: 40,
        energy_level: analysis.scan.energy_level,
        learning_style: LearningStyle::Visual,
        recent_performance: RecentPerformance::default(),
        academic_calendar: AcademicCalendar::default(),
        preferences: QuestPreferences::default(),
    };
    let generated = engine.generate(&ctx).unwrap();

    let builder = SnapshotBuilder::new().with_session_id("morning-1".into());
    let json = builder.build_json(
        analysis.scan,
        analysis.interventions,
        Some(generated.quest),
        None,
    );

    let parsed: AssessmentSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.snapshot_version, "1.0");
    assert!(parsed.quest.is_some());
    let quest = parsed.quest.unwrap();
    assert!((0.2..=1.0).contains(&quest.difficulty));
    assert!(quest.objectives.iter().all(|o| o.quantity >= 1));
}

#[tokio::test]
async fn high_stress_scenario_triggers_wellness_path() {
    let analyzer = EnvironmentContextAnalyzer::without_models();
    let engine = AdaptiveQuestEngine::new();

    let mut ambient = AmbientContext::new("exam hall", TimeOfDay::Afternoon);
    ambient.heart_rate = Some(130.0);
    ambient.ambient_noise_db = Some(70.0);
    ambient.recent_stress_events = Some(2);

    let analysis = analyzer
        .analyze(&Default::default(), &ambient)
        .await
        .unwrap();
    assert!(analysis.scan.stress_level > 0.6);
    assert!(analysis
        .interventions
        .iter()
        .any(|s| s.priority == SignalPriority::High));

    // A stressed scan steers generation to a wellness quest
    let ctx = GenerationContext {
        user_id: "student-7".into(),
        subject: "Biology".into(),
        environment: analysis.scan.clone(),
        focus: "cell division".into(),
        available_minutes: 30,
        energy_level: analysis.scan.energy_level,
        learning_style: LearningStyle::Reading,
        recent_performance: RecentPerformance {
            completion_rate: 0.8,
            accuracy: 0.8,
        },
        academic_calendar: AcademicCalendar::default(),
        preferences: QuestPreferences::default(),
    };
    let generated = engine.generate(&ctx).unwrap();
    assert_eq!(generated.category, QuestCategory::Wellness);
    assert_eq!(generated.quest.time_limit_minutes, 10);
}

#[tokio::test]
async fn degraded_inputs_still_produce_full_scores() {
    let analyzer = EnvironmentContextAnalyzer::without_models();
    let ambient = AmbientContext::new("somewhere", TimeOfDay::Night);

    let analysis = analyzer
        .analyze(&Default::default(), &ambient)
        .await
        .unwrap();
    assert!(analysis.scan.degraded);
    assert!((0.0..=1.0).contains(&analysis.scan.focus_level));
    assert!((0.0..=1.0).contains(&analysis.scan.energy_level));
    assert!((0.0..=1.0).contains(&analysis.scan.stress_level));
    assert_eq!(analysis.scan.intent, "rest and recovery");
}

#[tokio::test]
async fn generate_is_idempotent_across_pipeline() {
    let analyzer = EnvironmentContextAnalyzer::without_models();
    let engine = AdaptiveQuestEngine::new();
    let adapter = DetectionAdapter::new();

    let detections = adapter.normalize(&raw_detections()).unwrap();
    let analysis = analyzer
        .analyze(&detections, &ambient_library())
        .await
        .unwrap();

    let ctx = GenerationContext {
        user_id: "student-7".into(),
        subject: "Algebra II".into(),
        environment: analysis.scan,
        focus: "quadratics".into(),
        available_minutes: 40,
        energy_level: 0.6,
        learning_style: LearningStyle::Visual,
        recent_performance: RecentPerformance {
            completion_rate: 0.5,
            accuracy: 0.5,
        },
        academic_calendar: AcademicCalendar::default(),
        preferences: QuestPreferences {
            collaborators: vec![],
            challenge_bias: ChallengeBias::Balanced,
        },
    };

    let first = engine.generate(&ctx).unwrap();
    let second = engine.generate(&ctx).unwrap();
    assert_eq!(first.category, second.category);
    assert_eq!(first.quest.id, second.quest.id);
    assert_eq!(first.quest.difficulty, second.quest.difficulty);
    assert_eq!(first.category, QuestCategory::Foundation);
    assert_eq!(first.quest.difficulty, 0.25);
}

#[test]
fn recalibration_laws_hold() {
    let engine = AdaptiveQuestEngine::new();
    let ctx = GenerationContext {
        user_id: "student-7".into(),
        subject: "Chemistry".into(),
        environment: stub_scan(),
        focus: "stoichiometry".into(),
        available_minutes: 60,
        energy_level: 0.8,
        learning_style: LearningStyle::Kinesthetic,
        recent_performance: RecentPerformance {
            completion_rate: 0.9,
            accuracy: 0.9,
        },
        academic_calendar: AcademicCalendar::default(),
        preferences: QuestPreferences::default(),
    };
    let quest = engine.generate(&ctx).unwrap().quest;

    let failed = engine.recalibrate(
        &quest,
        &QuestOutcome {
            success: false,
            accuracy: 0.3,
        },
    );
    assert!((failed.difficulty - (quest.difficulty - 0.1).max(0.2)).abs() < 1e-9);
    for (orig, upd) in quest.objectives.iter().zip(&failed.objectives) {
        assert_eq!(
            upd.quantity,
            ((orig.quantity as f64 * 0.75).round() as u32).max(1)
        );
    }

    let aced = engine.recalibrate(
        &quest,
        &QuestOutcome {
            success: true,
            accuracy: 0.95,
        },
    );
    assert!((aced.difficulty - (quest.difficulty + 0.1).min(1.0)).abs() < 1e-9);
}

#[test]
fn risk_pipeline_schedules_high_priority_within_two_hours() {
    let scorer = RiskScorer::default();
    let signal = lenscore::risk::RiskSignal {
        user_id: "student-7".into(),
        academic_risk: 0.8,
        stress_risk: 0.3,
        absenteeism_risk: 0.1,
        narrative: String::new(),
    };

    let before = chrono::Utc::now();
    let intervention = scorer.schedule_intervention(&signal);
    let after = chrono::Utc::now();

    assert_eq!(intervention.priority, Priority::High);
    assert!(intervention.scheduled_at >= before + chrono::Duration::hours(2));
    assert!(intervention.scheduled_at <= after + chrono::Duration::hours(2));
}

#[test]
fn risk_defaults_keep_scoring_unblocked() {
    let scorer = RiskScorer::default();
    let signal = scorer.evaluate_risk(&RiskHistory {
        user_id: "student-7".into(),
        ..Default::default()
    });
    assert_eq!(signal.academic_risk, 0.35);
    let intervention = scorer.schedule_intervention(&signal);
    assert_eq!(intervention.priority, Priority::Low);
}

#[tokio::test]
async fn validation_errors_fail_fast() {
    let adapter = DetectionAdapter::new();
    let bad = RawDetections {
        predictions: vec![RawPrediction {
            label: "book".into(),
            score: 2.0,
            bbox: [0.0, 0.0, 1.0, 1.0],
        }],
        face_scores: vec![],
    };
    assert!(matches!(
        adapter.normalize(&bad),
        Err(EngineError::Validation(_))
    ));

    let engine = AdaptiveQuestEngine::new();
    let mut ctx = GenerationContext {
        user_id: "student-7".into(),
        subject: "Algebra II".into(),
        environment: stub_scan(),
        focus: "quadratics".into(),
        available_minutes: 30,
        energy_level: 0.5,
        learning_style: LearningStyle::Visual,
        recent_performance: RecentPerformance::default(),
        academic_calendar: AcademicCalendar::default(),
        preferences: QuestPreferences::default(),
    };
    ctx.available_minutes = 0;
    assert!(matches!(
        engine.generate(&ctx),
        Err(EngineError::Validation(_))
    ));
}

fn stub_scan() -> lenscore::EnvironmentScan {
    lenscore::EnvironmentScan {
        objects: vec![],
        people_count: 0,
        activity: lenscore::context::Activity::Studying,
        mood: lenscore::context::Mood::Balanced,
        intent: "complete coursework".into(),
        location: "library".into(),
        time_of_day: TimeOfDay::Afternoon,
        focus_level: 0.6,
        energy_level: 0.6,
        stress_level: 0.4,
        degraded: false,
    }
}
