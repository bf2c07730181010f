//! raystage - a headless VR pointer-interaction engine
//!
//! Drives a controller ray over a prop scene with hover/select highlighting,
//! prototype spawning on surfaces, and a stage light/audio toggle.

mod config;
mod harness;
mod input;
mod scripted_input;

use anyhow::Result;
use config::ControlsConfig;
use std::{env, path::PathBuf, sync::Arc};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting raystage v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));

    let mut controls = match &cli.config {
        Some(path) => ControlsConfig::load_from_path(path),
        None => ControlsConfig::load(),
    };
    if let Some(use_right) = cli.use_right_hand {
        controls.use_right_hand = use_right;
    }
    if cli.no_audio {
        controls.audio_muted = true;
    }
    if cli.save_config {
        controls.save()?;
        info!("Saved effective controls config");
    }
    let controls = Arc::new(controls);

    harness::run(harness::HarnessConfig {
        controls,
        script: cli.script,
        max_ticks: cli.max_ticks,
        event_log: cli.event_log,
        no_audio: cli.no_audio,
    })
}

struct CliOptions {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    max_ticks: Option<u64>,
    event_log: Option<PathBuf>,
    use_right_hand: Option<bool>,
    no_audio: bool,
    save_config: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: None,
            script: None,
            max_ticks: None,
            event_log: None,
            use_right_hand: None,
            no_audio: false,
            save_config: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--script" => {
                    if let Some(path) = args.next() {
                        opts.script = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--script requires a file path");
                    }
                }
                "--max-ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--max-ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--max-ticks requires an integer");
                    }
                }
                "--event-log" => {
                    if let Some(path) = args.next() {
                        opts.event_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--event-log requires a file path");
                    }
                }
                "--hand" => match args.next().as_deref() {
                    Some("left") => opts.use_right_hand = Some(false),
                    Some("right") => opts.use_right_hand = Some(true),
                    Some(other) => {
                        tracing::error!(value = %other, "--hand must be 'left' or 'right'");
                    }
                    None => tracing::error!("--hand requires 'left' or 'right'"),
                },
                "--no-audio" => opts.no_audio = true,
                "--save-config" => opts.save_config = true,
                other => {
                    tracing::warn!(arg = %other, "Ignoring unknown argument");
                }
            }
        }

        opts
    }
}
