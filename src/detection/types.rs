//! Normalized detection types consumed by the context analyzer.

use serde::{Deserialize, Serialize};

/// Object labels treated as study tools.
const STUDY_TOOL_LABELS: &[&str] = &[
    "book",
    "laptop",
    "cell phone",
    "tablet",
    "pen",
    "notebook",
    "keyboard",
];

/// Object labels treated as distractions.
///
/// Hand-picked list preserved from observed classifier behavior; no
/// confidence threshold is applied to membership.
const DISTRACTION_LABELS: &[&str] = &[
    "television",
    "game controller",
    "remote",
    "sports ball",
    "cup",
];

/// Object labels treated as wellness supports.
const WELLNESS_LABELS: &[&str] = &["water bottle", "yoga mat", "chair", "sofa"];

/// The role an object plays in the student's environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectRole {
    /// Supports focused academic work (book, laptop, pen, ...)
    StudyTool,
    /// Pulls attention away (television, game controller, ...)
    Distraction,
    /// Supports physical/mental wellbeing (water bottle, yoga mat, ...)
    WellnessSupport,
    /// Anything unrecognized; neutral presence in the scene
    Anchor,
}

impl ObjectRole {
    /// Classify a detected label through the fixed lookup sets.
    /// Unknown labels default to `Anchor`.
    pub fn from_label(label: &str) -> Self {
        if STUDY_TOOL_LABELS.contains(&label) {
            ObjectRole::StudyTool
        } else if DISTRACTION_LABELS.contains(&label) {
            ObjectRole::Distraction
        } else if WELLNESS_LABELS.contains(&label) {
            ObjectRole::WellnessSupport
        } else {
            ObjectRole::Anchor
        }
    }
}

/// Axis-aligned bounding box in image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A single normalized object detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Model label, as emitted by the upstream classifier
    pub label: String,
    /// Detection confidence in `[0, 1]`
    pub confidence: f64,
    /// Bounding box of the detection
    pub bounds: Rect,
    /// Derived environmental role
    pub role: ObjectRole,
}

/// Normalized output of one detection pass: objects plus face confidences.
///
/// People count is taken from the number of detected faces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionSet {
    /// Normalized object detections
    pub objects: Vec<DetectedObject>,
    /// Per-face confidence scores in `[0, 1]`
    pub face_confidences: Vec<f64>,
}

impl DetectionSet {
    /// Number of people in the scene (one per detected face).
    pub fn people_count(&self) -> usize {
        self.face_confidences.len()
    }

    /// Check whether any detection carries the given role.
    pub fn has_role(&self, role: ObjectRole) -> bool {
        self.objects.iter().any(|o| o.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_lookup() {
        assert_eq!(ObjectRole::from_label("book"), ObjectRole::StudyTool);
        assert_eq!(ObjectRole::from_label("television"), ObjectRole::Distraction);
        assert_eq!(
            ObjectRole::from_label("water bottle"),
            ObjectRole::WellnessSupport
        );
        assert_eq!(ObjectRole::from_label("giraffe"), ObjectRole::Anchor);
    }

    #[test]
    fn test_detection_set_roles() {
        let set = DetectionSet {
            objects: vec![DetectedObject {
                label: "laptop".into(),
                confidence: 0.9,
                bounds: Rect::default(),
                role: ObjectRole::from_label("laptop"),
            }],
            face_confidences: vec![0.8, 0.85],
        };

        assert_eq!(set.people_count(), 2);
        assert!(set.has_role(ObjectRole::StudyTool));
        assert!(!set.has_role(ObjectRole::Distraction));
    }
}
