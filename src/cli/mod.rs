
use crate::config::credentials::{CREDENTIAL_ENV_VARS, detect_source};
use crate::config::{Config, VideoStrategy, get_config_path, load_config};
use crate::misskey::{DriveFile, Payload};
use crate::relay::{Relay, composer, filter, planner};
use crate::twitter::TwitterClient;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "noterelay")]
#[command(about = "Relay Misskey notes to Twitter", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
    /// Show what a webhook payload would be relayed as, without network access
    Plan {
        /// Path to a webhook payload JSON file
        payload: PathBuf,
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
    /// Load and validate the configuration, then print it with secrets redacted
    CheckConfig {
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            serve(host, port, config.as_deref()).await?;
        }
        Commands::Plan { payload, config } => {
            let config = load_config(config.as_deref())?;
            let bytes = std::fs::read(&payload)
                .with_context(|| format!("Failed to read {}", payload.display()))?;
            let report = dry_run(&bytes, config.relay.video_strategy)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::CheckConfig { config } => {
            let path = match config {
                Some(p) => p,
                None => get_config_path()?,
            };
            let config = load_config(Some(path.as_path()))?;
            println!("{}", describe_config(&path, &config));
        }
    }

    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    info!(
        "noterelay {} starting (video strategy: {})",
        crate::VERSION,
        config.relay.video_strategy
    );
    let publisher = Arc::new(TwitterClient::new(&config.twitter));
    let relay = Arc::new(Relay::new(&config, publisher));

    crate::gateway::serve(&config.server.host, config.server.port, relay, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
    })
    .await
}

/// Dry-run result of the `plan` command.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    /// `"relay"`, or the reply the webhook would have received.
    pub verdict: String,
    pub upload: Vec<DriveFile>,
    pub link_only: Vec<DriveFile>,
    pub dropped: Vec<DriveFile>,
    pub message: String,
}

/// Run the eligibility, planning, and composition steps of the relay on a
/// payload, skipping authentication and every network call.
pub fn dry_run(payload: &[u8], strategy: VideoStrategy) -> Result<PlanReport> {
    let payload: Payload = serde_json::from_slice(payload).context("invalid payload")?;
    let note = payload.body.note;

    let plan = planner::plan_media(note.files(), strategy);
    let message = composer::compose(note.cw.as_deref(), note.text.as_deref(), &plan.to_link_only);

    let verdict = match filter::check_visibility(&note) {
        Err(e) => e.reply(),
        Ok(()) if message.is_empty() => crate::errors::RelayError::EmptyContent.reply(),
        Ok(()) => "relay".to_string(),
    };

    let owned = |files: &[&DriveFile]| files.iter().map(|f| (*f).clone()).collect::<Vec<_>>();
    Ok(PlanReport {
        verdict,
        upload: owned(&plan.to_upload),
        link_only: owned(&plan.to_link_only),
        dropped: owned(&plan.dropped),
        message,
    })
}

fn describe_config(path: &Path, config: &Config) -> String {
    let mut out = format!("config: {}\n", path.display());
    if !path.exists() {
        out.push_str("  (file not found, using defaults)\n");
    }
    out.push_str(&format!("{:#?}\n\ncredentials:\n", config));
    for (name, env) in CREDENTIAL_ENV_VARS {
        out.push_str(&format!(
            "  {:<24} {:<8} ({})\n",
            name,
            detect_source(name, config),
            env
        ));
    }
    out
}
