//! Journey application binary - composition root.
//!
//! 1. Parse CLI flags
//! 2. Load configuration (file, then env, then flags)
//! 3. Open a conversation view over the webhook client
//! 4. Run one message (`--once`) or an interactive loop on stdin

mod cli;
mod render;

use std::path::Path;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use journey_chat::ConversationController;
use journey_core::{JourneyConfig, JourneyError};

use cli::CliArgs;

const QUIT_COMMAND: &str = "/quit";

/// How the config file was read, reported after tracing starts.
#[derive(Debug)]
enum ConfigOutcome {
    Loaded,
    Missing,
    Invalid(JourneyError),
}

/// Read the config file without logging; defaults stand in when it is
/// missing or broken.
fn load_config(path: &Path) -> (JourneyConfig, ConfigOutcome) {
    match JourneyConfig::try_load(path) {
        Ok(Some(config)) => (config, ConfigOutcome::Loaded),
        Ok(None) => (JourneyConfig::default(), ConfigOutcome::Missing),
        Err(e) => (JourneyConfig::default(), ConfigOutcome::Invalid(e)),
    }
}

/// Build the log filter. RUST_LOG wins over the configured level.
fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Send one message and print the assistant turn.
async fn run_once(controller: &mut ConversationController, text: &str) {
    match controller.submit(text).await {
        Some(turn) => print!("{}", render::render_turn(turn)),
        None => tracing::warn!("Nothing to send: message is blank"),
    }
}

/// Interactive loop: one line of stdin per user turn until `/quit` or EOF.
async fn run_interactive(
    controller: &mut ConversationController,
) -> Result<(), Box<dyn std::error::Error>> {
    for turn in controller.turns() {
        print!("{}", render::render_turn(turn));
    }
    print!("{}", render::render_suggestions(controller.quick_suggestions()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }
        let Some(pending) = controller.begin(&line) else {
            continue;
        };
        println!("{}", render::THINKING_INDICATOR);
        let reply = pending.fetch().await;
        match controller.complete(pending, reply) {
            Ok(turn) => print!("{}", render::render_turn(turn)),
            Err(e) => tracing::warn!(error = %e, "Reply discarded"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. The file's log level feeds the subscriber, so the load outcome
    // is held and reported once tracing is up.
    let config_file = args.resolve_config_path();
    let (mut config, outcome) = load_config(&config_file);
    config.apply_env();
    args.apply_overrides(&mut config);

    // Tracing goes to stderr so replies stay clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.general.log_level))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Journey v{}", env!("CARGO_PKG_VERSION"));
    match outcome {
        ConfigOutcome::Loaded => {
            tracing::info!(path = %config_file.display(), "Configuration loaded")
        }
        ConfigOutcome::Missing => {
            tracing::info!(path = %config_file.display(), "No config file found, using defaults")
        }
        ConfigOutcome::Invalid(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    let mut controller = ConversationController::from_config(&config.assistant);

    if let Some(ref text) = args.once {
        run_once(&mut controller, text).await;
    } else {
        run_interactive(&mut controller).await?;
    }

    let summary = controller.close();
    tracing::info!(
        session = %summary.session_token,
        turns = summary.turn_count,
        duration_secs = (summary.closed_at - summary.opened_at).num_seconds(),
        "Session ended"
    );

    Ok(())
}
