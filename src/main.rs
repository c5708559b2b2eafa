//! LensCore CLI
//!
//! Runs the quest intelligence engine against JSON inputs, for local
//! experimentation and pipeline debugging.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lenscore::{
    config::EngineConfig,
    context::{AmbientContext, EnvironmentContextAnalyzer, TimeOfDay},
    detection::{DetectionAdapter, RawDetections},
    quest::{AdaptiveQuestEngine, GenerationContext},
    risk::{RiskHistory, RiskScorer},
    snapshot::SnapshotBuilder,
    VERSION,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lenscore")]
#[command(version = VERSION)]
#[command(about = "Context-adaptive quest intelligence engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a detection pass against ambient signals
    Scan {
        /// Path to raw detections JSON (predictions + face scores)
        #[arg(long, short)]
        detections: Option<PathBuf>,

        /// Location string
        #[arg(long, default_value = "unknown")]
        location: String,

        /// Time of day (morning, afternoon, evening, night)
        #[arg(long, default_value = "afternoon")]
        time_of_day: String,

        /// Ambient noise in dB
        #[arg(long)]
        noise: Option<f64>,

        /// Heart rate in bpm
        #[arg(long)]
        heart_rate: Option<f64>,

        /// Recent stress event count
        #[arg(long)]
        stress_events: Option<u32>,

        /// Scheduled focus topic
        #[arg(long)]
        focus: Option<String>,
    },

    /// Generate a quest from a generation context JSON file
    Quest {
        /// Path to the generation context JSON
        context: PathBuf,
    },

    /// Evaluate risk and schedule an intervention from a history JSON file
    Risk {
        /// Path to the risk history JSON
        history: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

fn parse_time_of_day(s: &str) -> Result<TimeOfDay> {
    match s {
        "morning" => Ok(TimeOfDay::Morning),
        "afternoon" => Ok(TimeOfDay::Afternoon),
        "evening" => Ok(TimeOfDay::Evening),
        "night" => Ok(TimeOfDay::Night),
        other => anyhow::bail!("unknown time of day: {other}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Scan {
            detections,
            location,
            time_of_day,
            noise,
            heart_rate,
            stress_events,
            focus,
        } => {
            let raw: RawDetections = match detections {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {path:?}"))?;
                    serde_json::from_str(&content).context("invalid detections JSON")?
                }
                None => RawDetections::default(),
            };

            let adapter = DetectionAdapter::new();
            let detection_set = adapter.normalize(&raw)?;

            let mut ambient = AmbientContext::new(location, parse_time_of_day(&time_of_day)?);
            ambient.ambient_noise_db = noise;
            ambient.heart_rate = heart_rate;
            ambient.recent_stress_events = stress_events;
            ambient.schedule_focus = focus;

            let analyzer = EnvironmentContextAnalyzer::without_models();
            let result = analyzer.analyze(&detection_set, &ambient).await?;

            let builder = SnapshotBuilder::new();
            println!(
                "{}",
                builder.build_json(result.scan, result.interventions, None, None)
            );
        }

        Commands::Quest { context } => {
            let content = std::fs::read_to_string(&context)
                .with_context(|| format!("failed to read {context:?}"))?;
            let ctx: GenerationContext =
                serde_json::from_str(&content).context("invalid generation context JSON")?;

            let engine = AdaptiveQuestEngine::new();
            let result = engine.generate(&ctx)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Risk { history } => {
            let content = std::fs::read_to_string(&history)
                .with_context(|| format!("failed to read {history:?}"))?;
            let history: RiskHistory =
                serde_json::from_str(&content).context("invalid risk history JSON")?;

            let scorer = RiskScorer::new(config.support_resources.clone());
            let signal = scorer.evaluate_risk(&history);
            let intervention = scorer.schedule_intervention(&signal);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "signal": signal,
                    "intervention": intervention,
                }))?
            );
        }

        Commands::Config => {
            println!("Config path: {:?}", EngineConfig::config_path());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
