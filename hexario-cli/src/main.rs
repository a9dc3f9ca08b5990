//! HEXARIO CLI - Command-line interface
//!
//! Commands:
//! - play: Run one game with scripted agents
//! - bench: Measure simulation throughput

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use hexario_cli::bench::{self, BenchArgs};
use hexario_cli::load_config;
use hexario_cli::play::{self, PlayArgs};

#[derive(Parser)]
#[command(name = "hexario")]
#[command(about = "HEXARIO territory capture simulator")]
struct Cli {
    /// Engine config JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one game with scripted agents
    Play(PlayArgs),
    /// Run many games in parallel and report throughput
    Bench(BenchArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Play(args) => play::run(args, config),
        Commands::Bench(args) => bench::run(args, config),
    }
}
