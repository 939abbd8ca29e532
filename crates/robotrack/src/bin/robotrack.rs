//! robotrack CLI: track colored robot markers from mask images.

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use robotrack::io::TrackConfig;
use robotrack::track::track_config;
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "robotrack")]
#[command(about = "Robot positions and headings from per-color binary masks")]
#[command(version)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Emit logs as JSON (with the `tracing` feature).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track robots in one frame described by a JSON config.
    Track(TrackArgs),

    /// Write a config template with default tracker params.
    DefaultConfig {
        /// Output path; prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct TrackArgs {
    /// Path to the JSON config.
    #[arg(long)]
    config: PathBuf,

    /// Report path; overrides `output_path` from the config.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Process the frame this many times and report timing statistics.
    #[arg(long, default_value_t = 1)]
    repeat: usize,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_json)?;
    match cli.command {
        Commands::Track(args) => run_track(&args),
        Commands::DefaultConfig { out } => run_default_config(out),
    }
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter, json: bool) -> CliResult<()> {
    tracing_log::LogTracer::init_with_filter(level)?;
    robotrack::core::init_tracing(json);
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter, _json: bool) -> CliResult<()> {
    robotrack::core::init_with_level(level)?;
    Ok(())
}

fn run_track(args: &TrackArgs) -> CliResult<()> {
    log::info!("loading config {}", args.config.display());
    let cfg = TrackConfig::load_json(&args.config)?;
    let report = track_config(&cfg, &args.config, args.repeat)?;

    let out = args.out.clone().unwrap_or_else(|| cfg.output_path());
    report.write_json(&out)?;
    for issue in &report.issues {
        log::warn!("{issue}");
    }
    println!("{}", out.display());
    Ok(())
}

fn run_default_config(out: Option<PathBuf>) -> CliResult<()> {
    let cfg = TrackConfig::template();
    match out {
        Some(path) => {
            cfg.write_json(&path)?;
            println!("{}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&cfg)?),
    }
    Ok(())
}
