//! Serializable assessment envelope for the sync layer.
//!
//! Orchestration flows push engine output to UI and sync consumers as pure
//! value objects. This module packages one assessment pass (scan, signals,
//! optional quest and risk) into a versioned JSON envelope with producer
//! metadata, so downstream consumers can evolve independently of the
//! engine's internal types.

use crate::context::scan::{EnvironmentScan, InterventionSignal};
use crate::quest::types::Quest;
use crate::risk::RiskSignal;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The current snapshot format version.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// The name of this producer.
pub const PRODUCER_NAME: &str = "lenscore";

/// Producer metadata carried in every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotProducer {
    pub name: String,
    pub version: String,
    /// Unique instance identifier
    pub instance_id: String,
}

/// One assessment pass, packaged for the sync layer.
///
/// Contains no callbacks or live references; safe to serialize, queue, and
/// replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSnapshot {
    /// Snapshot schema version
    pub snapshot_version: String,
    /// When the assessment was computed (RFC3339)
    pub computed_at_utc: String,
    pub producer: SnapshotProducer,
    /// Session this snapshot belongs to, if the caller tracks one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub scan: EnvironmentScan,
    pub interventions: Vec<InterventionSignal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quest: Option<Quest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskSignal>,
}

/// Builder for assessment snapshots.
pub struct SnapshotBuilder {
    instance_id: Uuid,
    session_id: Option<String>,
}

impl SnapshotBuilder {
    /// Create a new builder with a unique instance ID.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            session_id: None,
        }
    }

    /// Set the session ID for generated snapshots.
    pub fn with_session_id(mut self, session_id: String) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Build a snapshot from one assessment pass.
    pub fn build(
        &self,
        scan: EnvironmentScan,
        interventions: Vec<InterventionSignal>,
        quest: Option<Quest>,
        risk: Option<RiskSignal>,
    ) -> AssessmentSnapshot {
        AssessmentSnapshot {
            snapshot_version: SNAPSHOT_VERSION.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
            producer: SnapshotProducer {
                name: PRODUCER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                instance_id: self.instance_id.to_string(),
            },
            session_id: self.session_id.clone(),
            scan,
            interventions,
            quest,
            risk,
        }
    }

    /// Build and serialize a snapshot to JSON.
    pub fn build_json(
        &self,
        scan: EnvironmentScan,
        interventions: Vec<InterventionSignal>,
        quest: Option<Quest>,
        risk: Option<RiskSignal>,
    ) -> String {
        let snapshot = self.build(scan, interventions, quest, risk);
        serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
