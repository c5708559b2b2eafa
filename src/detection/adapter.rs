//! Adapter from raw model predictions to a normalized `DetectionSet`.
//!
//! Upstream vision models emit `(label, score, bbox)` tuples and a list of
//! face probabilities. This adapter validates confidence ranges and derives
//! each object's environmental role. Model identity and version are
//! deliberately invisible past this boundary.

use crate::detection::types::{DetectedObject, DetectionSet, ObjectRole, Rect};
use crate::error::{ensure_unit_range, EngineError};
use serde::{Deserialize, Serialize};

/// One raw prediction from an object detection model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Class label emitted by the model
    pub label: String,
    /// Model score in `[0, 1]`
    pub score: f64,
    /// Bounding box `[x, y, width, height]`
    pub bbox: [f64; 4],
}

/// Raw output of one detection pass, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDetections {
    /// Object predictions
    pub predictions: Vec<RawPrediction>,
    /// Face detection probabilities in `[0, 1]`
    pub face_scores: Vec<f64>,
}

/// Normalizes raw model output into the engine's `DetectionSet` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionAdapter;

impl DetectionAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Normalize raw predictions.
    ///
    /// Confidences outside `[0, 1]` are a caller error, never repaired.
    pub fn normalize(&self, raw: &RawDetections) -> Result<DetectionSet, EngineError> {
        let mut objects = Vec::with_capacity(raw.predictions.len());
        for prediction in &raw.predictions {
            ensure_unit_range("object confidence", prediction.score)?;
            objects.push(DetectedObject {
                label: prediction.label.clone(),
                confidence: prediction.score,
                bounds: Rect {
                    x: prediction.bbox[0],
                    y: prediction.bbox[1],
                    width: prediction.bbox[2],
                    height: prediction.bbox[3],
                },
                role: ObjectRole::from_label(&prediction.label),
            });
        }

        for &score in &raw.face_scores {
            ensure_unit_range("face confidence", score)?;
        }

        Ok(DetectionSet {
            objects,
            face_confidences: raw.face_scores.clone(),
        })
    }
}
