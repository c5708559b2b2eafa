//! Coaching-message generation.
//!
//! The orchestration layer surfaces a short motivational message alongside
//! each plan. Two implementations exist behind one seam: a deterministic
//! local template and, behind the `remote-narrative` feature, a remote
//! language-model endpoint that falls back to the template on any failure.

use crate::config::{EngineConfig, NarrativeMode};
use serde::{Deserialize, Serialize};

#[cfg(feature = "remote-narrative")]
use crate::config::RemoteNarrativeConfig;

/// Inputs for one coaching message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingPrompt {
    /// Energy score in `[0, 1]`
    pub energy_score: f64,
    /// Today's focus topic
    pub focus: String,
    /// Commute length in minutes
    pub commute_minutes: u32,
    /// Title of the next generated quest
    pub next_quest_title: String,
    /// Upcoming assessment labels, soonest first
    pub upcoming_assessments: Vec<String>,
}

/// Deterministic offline coaching message.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTemplateNarrator;

impl LocalTemplateNarrator {
    pub fn compose(&self, prompt: &CoachingPrompt) -> String {
        let before = prompt
            .upcoming_assessments
            .first()
            .map(String::as_str)
            .unwrap_or("classes");
        format!(
            "Energy at {}%. Launch {} before {} and use your {}-minute commute to pre-load confidence.",
            (prompt.energy_score * 100.0).round() as i64,
            prompt.next_quest_title,
            before,
            prompt.commute_minutes
        )
    }
}

/// Remote chat-completion narrator.
#[cfg(feature = "remote-narrative")]
pub struct RemoteNarrator {
    client: reqwest::Client,
    config: RemoteNarrativeConfig,
    fallback: LocalTemplateNarrator,
}

#[cfg(feature = "remote-narrative")]
impl RemoteNarrator {
    pub fn new(config: RemoteNarrativeConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            config,
            fallback: LocalTemplateNarrator,
        }
    }

    /// Generate via the remote endpoint; any transport or decode failure
    /// falls back to the local template.
    pub async fn generate(&self, prompt: &CoachingPrompt) -> String {
        match self.request(prompt).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "remote narrative failed, using local template");
                self.fallback.compose(prompt)
            }
        }
    }

    async fn request(&self, prompt: &CoachingPrompt) -> Result<String, reqwest::Error> {
        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a motivational learning coach. Be concise, energizing, and specific to the student's day.",
                },
                {
                    "role": "user",
                    "content": format!(
                        "Energy score: {}. Focus: {}. Commute: {} minutes. Next quest: {}. Upcoming assessments: {}.",
                        prompt.energy_score,
                        prompt.focus,
                        prompt.commute_minutes,
                        prompt.next_quest_title,
                        if prompt.upcoming_assessments.is_empty() {
                            "none".to_string()
                        } else {
                            prompt.upcoming_assessments.join(", ")
                        }
                    ),
                }
            ],
            "temperature": 0.6,
            "max_tokens": 120,
        });

        let response: serde_json::Value = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("Let's own the morning!")
            .to_string())
    }
}

/// Configured narrative generator.
pub enum NarrativeGenerator {
    Local(LocalTemplateNarrator),
    #[cfg(feature = "remote-narrative")]
    Remote(RemoteNarrator),
}

impl NarrativeGenerator {
    /// Build from configuration. Remote mode without the feature or the
    /// endpoint settings degrades to the local template.
    pub fn from_config(config: &EngineConfig) -> Self {
        match config.narrative_mode {
            NarrativeMode::Local => NarrativeGenerator::Local(LocalTemplateNarrator),
            NarrativeMode::Remote => {
                #[cfg(feature = "remote-narrative")]
                if let Some(remote) = &config.remote_narrative {
                    return NarrativeGenerator::Remote(RemoteNarrator::new(remote.clone()));
                }
                tracing::warn!("remote narrative unavailable, using local template");
                NarrativeGenerator::Local(LocalTemplateNarrator)
            }
        }
    }

    pub async fn coaching_message(&self, prompt: &CoachingPrompt) -> String {
        match self {
            NarrativeGenerator::Local(local) => local.compose(prompt),
            #[cfg(feature = "remote-narrative")]
            NarrativeGenerator::Remote(remote) => remote.generate(prompt).await,
        }
    }
}
