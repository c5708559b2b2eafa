//! Situational assessment: fusing detections with ambient signals.

pub mod ambient;
pub mod analyzer;
pub mod scan;

pub use ambient::{AmbientContext, TimeOfDay};
pub use analyzer::{AnalysisResult, EnvironmentContextAnalyzer, ModelWarmup, NoopWarmup, WarmupFuture};
pub use scan::{Activity, EnvironmentScan, InterventionSignal, Mood, SignalPriority};
