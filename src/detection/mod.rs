//! Normalization of upstream object/face model output.
//!
//! The engine is agnostic to which vision model produced the predictions;
//! it consumes only the normalized `DetectionSet` shape.

pub mod adapter;
pub mod types;

pub use adapter::{DetectionAdapter, RawDetections, RawPrediction};
pub use types::{DetectedObject, DetectionSet, ObjectRole, Rect};
