//! Configuration for the quest intelligence engine.

use crate::risk::SupportResource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which coaching-message generator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeMode {
    /// Deterministic offline template
    Local,
    /// Remote language-model endpoint, with local fallback on failure
    Remote,
}

/// Settings for the remote narrative endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteNarrativeConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

/// Fallbacks applied when the history layer has no data for a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFallbacks {
    pub completion_rate: f64,
    pub accuracy: f64,
}

impl Default for HistoryFallbacks {
    fn default() -> Self {
        Self {
            completion_rate: 0.7,
            accuracy: 0.7,
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Coaching-message generator selection
    pub narrative_mode: NarrativeMode,

    /// Remote narrative endpoint settings (required for `Remote` mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_narrative: Option<RemoteNarrativeConfig>,

    /// Defaults for missing performance history
    pub history_fallbacks: HistoryFallbacks,

    /// Support resource catalog for intervention matching
    pub support_resources: Vec<SupportResource>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            narrative_mode: NarrativeMode::Local,
            remote_narrative: None,
            history_fallbacks: HistoryFallbacks::default(),
            support_resources: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: EngineConfig = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lenscore")
            .join("config.json")
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
