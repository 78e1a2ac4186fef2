//! Gridiron CLI
//!
//! Headless play runs, playbook listing and config tooling.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::{fmt, EnvFilter};

#[cfg(feature = "cli")]
use gridiron_cli::{load_catalog, load_config, run_play, Preset, RunOptions, ScriptedPass};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Run and inspect football plays headlessly", version)]
struct Cli {
    /// Tuning file (YAML or JSON); overrides --preset
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in tuning preset: realistic or arcade
    #[arg(long, global = true, default_value = "realistic")]
    preset: Preset,

    /// Extra playbook files (YAML or JSON), may repeat
    #[arg(long = "playbook", global = true)]
    playbooks: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Snap a play and run it to the end, printing events as JSON
    Run {
        /// Play name (default: the configured default play)
        #[arg(long)]
        play: Option<String>,

        /// Fixed tick length in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// Stop after this many seconds even if the play is still live
        #[arg(long, default_value = "15")]
        max_seconds: f32,

        /// Throw at this many seconds after the snap (pass plays)
        #[arg(long)]
        pass_at: Option<f32>,

        /// Stick direction for the throw, "x,y" with y downfield
        #[arg(long, default_value = "0,1")]
        direction: String,

        /// One JSON object per event instead of a full report
        #[arg(long)]
        events_only: bool,
    },

    /// List the available plays
    Plays,

    /// Print the effective tuning as YAML (or JSON)
    Config {
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON schema of the tuning file
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let config = load_config(cli.config.as_deref(), cli.preset)?;

    match cli.command {
        Commands::Run { play, dt, max_seconds, pass_at, direction, events_only } => {
            let pass = match pass_at {
                Some(at) => Some(ScriptedPass { at, direction: parse_direction(&direction)? }),
                None => None,
            };
            let catalog = load_catalog(cli.playbooks.as_slice())?;
            let options = RunOptions { play, dt, max_seconds, pass };
            let report = run_play(config, catalog, &options)?;
            if events_only {
                for event in &report.events {
                    println!("{}", serde_json::to_string(event)?);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }

        Commands::Plays => {
            let catalog = load_catalog(cli.playbooks.as_slice())?;
            for play in catalog.plays() {
                println!(
                    "{:<12} {:<5} {:>5.1}s  {}",
                    play.name,
                    format!("{:?}", play.play_type),
                    play.duration,
                    play.description
                );
            }
        }

        Commands::Config { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", serde_yaml::to_string(&config)?);
            }
        }

        Commands::Schema => {
            let schema = schemars::schema_for!(gridiron_core::EngineConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn parse_direction(text: &str) -> Result<(f32, f32)> {
    let (x, y) = text.split_once(',').context("direction must be \"x,y\"")?;
    let x = x.trim().parse::<f32>().with_context(|| format!("bad x in direction '{text}'"))?;
    let y = y.trim().parse::<f32>().with_context(|| format!("bad y in direction '{text}'"))?;
    Ok((x, y))
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gridiron CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
