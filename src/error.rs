//! Error taxonomy for the quest intelligence engine.
//!
//! Two failure classes exist: malformed caller input (`Validation`) and a
//! detection model that failed to warm up or threw mid-analysis
//! (`ModelUnavailable`). Sparse inputs are not errors; the analyzer proceeds
//! with documented fallbacks and marks the result as degraded.

/// Engine errors surfaced to callers.
///
/// Both variants propagate unmodified; the engine performs no retries.
/// Retry/backoff, if any, belongs to the orchestration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed or out-of-range primary input. Never silently repaired.
    Validation(String),
    /// Model warm-up failed or the detector threw. Fatal for this call;
    /// warm-up is retried lazily on the next call.
    ModelUnavailable(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(e) => write!(f, "validation error: {e}"),
            EngineError::ModelUnavailable(e) => write!(f, "model unavailable: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Check that a score-like value sits in `[0.0, 1.0]`.
pub(crate) fn ensure_unit_range(name: &str, value: f64) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(EngineError::Validation(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range_accepts_bounds() {
        assert!(ensure_unit_range("score", 0.0).is_ok());
        assert!(ensure_unit_range("score", 1.0).is_ok());
    }

    #[test]
    fn test_unit_range_rejects_out_of_range() {
        assert!(ensure_unit_range("score", -0.01).is_err());
        assert!(ensure_unit_range("score", 1.01).is_err());
        assert!(ensure_unit_range("score", f64::NAN).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::Validation("available_minutes must be positive".into());
        assert!(err.to_string().contains("validation error"));
    }
}
