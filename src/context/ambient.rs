//! Ambient signals supplied alongside each detection pass.
//!
//! Readings are optional. Missing readings never block analysis; the
//! analyzer falls back to documented defaults and flags the scan as
//! degraded.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Coarse time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Ambient context for one analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientContext {
    /// Free-form location string ("library", "bus stop", "cafeteria east")
    pub location: String,
    /// Time-of-day bucket
    pub time_of_day: TimeOfDay,
    /// Current scheduled focus topic, if the caller has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_focus: Option<String>,
    /// Ambient noise level in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient_noise_db: Option<f64>,
    /// Heart rate in bpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    /// Count of stress events logged recently
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_stress_events: Option<u32>,
}

impl AmbientContext {
    /// Minimal context with only the required fields.
    pub fn new(location: impl Into<String>, time_of_day: TimeOfDay) -> Self {
        Self {
            location: location.into(),
            time_of_day,
            schedule_focus: None,
            ambient_noise_db: None,
            heart_rate: None,
            recent_stress_events: None,
        }
    }

    /// Reject physically impossible readings. Absent readings are fine.
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(noise) = self.ambient_noise_db {
            if !noise.is_finite() || noise < 0.0 {
                return Err(EngineError::Validation(format!(
                    "ambient_noise_db must be non-negative, got {noise}"
                )));
            }
        }
        if let Some(hr) = self.heart_rate {
            if !hr.is_finite() || hr <= 0.0 {
                return Err(EngineError::Validation(format!(
                    "heart_rate must be positive, got {hr}"
                )));
            }
        }
        Ok(())
    }

    /// Whether any ambient reading is missing.
    pub fn is_sparse(&self) -> bool {
        self.ambient_noise_db.is_none()
            || self.heart_rate.is_none()
            || self.recent_stress_events.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_negative_noise() {
        let mut ctx = AmbientContext::new("library", TimeOfDay::Morning);
        ctx.ambient_noise_db = Some(-5.0);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_heart_rate() {
        let mut ctx = AmbientContext::new("library", TimeOfDay::Morning);
        ctx.heart_rate = Some(0.0);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_sparse_detection() {
        let mut ctx = AmbientContext::new("library", TimeOfDay::Morning);
        assert!(ctx.is_sparse());

        ctx.ambient_noise_db = Some(45.0);
        ctx.heart_rate = Some(72.0);
        ctx.recent_stress_events = Some(0);
        assert!(!ctx.is_sparse());
        assert!(ctx.validate().is_ok());
    }
}
