//! LensCore - context-adaptive quest intelligence engine.
//!
//! This library turns raw perceptual signals (detected objects, face
//! confidences, ambient noise, heart rate) and academic history into a
//! normalized situational assessment, a procedurally generated quest
//! calibrated to the student's current state, and a risk score used to
//! schedule human-facing interventions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       LensCore Engine                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────┐   ┌────────────────┐     │
//! │  │ Detection  │──▶│ Environment  │──▶│ AdaptiveQuest  │     │
//! │  │  Adapter   │   │   Analyzer   │   │    Engine      │     │
//! │  └────────────┘   └──────────────┘   └────────────────┘     │
//! │                          │                    │              │
//! │                          ▼                    ▼              │
//! │                   ┌────────────┐      ┌──────────────┐      │
//! │                   │ RiskScorer │      │  Assessment  │      │
//! │                   │            │      │   Snapshot   │      │
//! │                   └────────────┘      └──────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All three engines are stateless pure functions over their explicit
//! inputs; the one asynchronous boundary is the analyzer's one-time model
//! warm-up, shared across concurrent callers.
//!
//! # Example
//!
//! ```no_run
//! use lenscore::context::{AmbientContext, EnvironmentContextAnalyzer, TimeOfDay};
//! use lenscore::detection::DetectionSet;
//!
//! # async fn run() -> Result<(), lenscore::EngineError> {
//! let analyzer = EnvironmentContextAnalyzer::without_models();
//! let mut ambient = AmbientContext::new("library", TimeOfDay::Morning);
//! ambient.heart_rate = Some(72.0);
//!
//! let result = analyzer.analyze(&DetectionSet::default(), &ambient).await?;
//! println!("mood: {:?}", result.scan.mood);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod detection;
pub mod error;
pub mod narrative;
pub mod quest;
pub mod risk;
pub mod snapshot;

// Re-export key types at crate root for convenience
pub use config::{EngineConfig, NarrativeMode};
pub use context::{
    AmbientContext, AnalysisResult, EnvironmentContextAnalyzer, EnvironmentScan,
    InterventionSignal, ModelWarmup, NoopWarmup, TimeOfDay,
};
pub use detection::{DetectionAdapter, DetectionSet, RawDetections};
pub use error::EngineError;
pub use narrative::{CoachingPrompt, LocalTemplateNarrator, NarrativeGenerator};
pub use quest::{AdaptiveQuestEngine, GenerationContext, GenerationResult, Quest, QuestOutcome};
pub use risk::{Intervention, Priority, RiskHistory, RiskScorer, RiskSignal, SupportResource};
pub use snapshot::{AssessmentSnapshot, SnapshotBuilder};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
