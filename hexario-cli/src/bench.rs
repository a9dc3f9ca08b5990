//! Bench command - throughput of independent engines in parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_games(), report_results()
//! - Level 3: run_single_game()
//! - Level 4: progress bar, formatting

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use hexario_core::{Engine, EngineConfig};

use crate::policy::{agents_for, choose_actions};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Clone, Debug)]
pub struct BenchArgs {
    /// Number of independent games
    #[arg(long, default_value = "32")]
    pub games: usize,

    /// Ticks per game
    #[arg(long, default_value = "1000")]
    pub ticks: u64,

    /// Map radius (overrides the config file)
    #[arg(long)]
    pub radius: Option<u32>,

    /// Number of players (overrides the config file)
    #[arg(long)]
    pub players: Option<usize>,

    /// Also encode every player's observation each tick
    #[arg(long)]
    pub observe: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Counts from one benchmarked game
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameStats {
    pub ticks: u64,
    /// Deaths, each followed by a respawn
    pub deaths: u64,
}

/// Aggregated benchmark results
#[derive(Clone, Debug, Serialize)]
pub struct BenchResults {
    pub games: usize,
    pub ticks: u64,
    pub deaths: u64,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run bench command
///
/// This function reads like a table of contents:
/// 1. Apply overrides to the shared config
/// 2. Run every game in parallel
/// 3. Report throughput
pub fn run(args: BenchArgs, mut config: EngineConfig) -> Result<()> {
    if let Some(radius) = args.radius {
        config.map_radius = radius;
    }
    if let Some(players) = args.players {
        config.num_players = players;
    }
    config.validate().context("Invalid engine configuration")?;

    tracing::info!(
        "Starting benchmark: {} games x {} ticks, radius {}, {} players",
        args.games,
        args.ticks,
        config.map_radius,
        config.num_players
    );

    let progress = if args.quiet {
        None
    } else {
        Some(progress_bar(args.games as u64)?)
    };

    let results = run_games(&config, &args, progress.as_ref())?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in parallel, each with its own seed
pub fn run_games(
    config: &EngineConfig,
    args: &BenchArgs,
    progress: Option<&ProgressBar>,
) -> Result<BenchResults> {
    let base_seed = config.seed_or_default();
    let start = Instant::now();

    let stats = (0..args.games)
        .into_par_iter()
        .map(|game| {
            let config = config.clone().with_seed(base_seed.wrapping_add(game as u64));
            let stats = run_single_game(config, args.ticks, args.observe);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            stats
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(aggregate(&stats, start.elapsed()))
}

fn report_results(results: &BenchResults, args: &BenchArgs) {
    if args.json {
        if let Ok(json) = serde_json::to_string_pretty(results) {
            println!("{}", json);
        }
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Run one engine for `ticks` ticks, respawning the dead
pub fn run_single_game(config: EngineConfig, ticks: u64, observe: bool) -> Result<GameStats> {
    let mut engine = Engine::setup(config)?;
    let mut agents = agents_for(engine.num_players(), engine.config().seed_or_default());
    let mut buf = vec![0.0; engine.observation_len()];
    let mut stats = GameStats::default();

    for _ in 0..ticks {
        let actions = choose_actions(&engine, &mut agents)?;
        engine.take_actions(&actions)?;
        stats.ticks += 1;

        for id in 0..engine.num_players() {
            if observe {
                engine.observe_into(id, &mut buf)?;
            }
            if engine.is_dead(id)? {
                stats.deaths += 1;
                engine.reset_player(id)?;
                agents[id].reset();
            }
        }
    }

    Ok(stats)
}

fn aggregate(stats: &[GameStats], elapsed: Duration) -> BenchResults {
    let ticks: u64 = stats.iter().map(|s| s.ticks).sum();
    let secs = elapsed.as_secs_f64();

    BenchResults {
        games: stats.len(),
        ticks,
        deaths: stats.iter().map(|s| s.deaths).sum(),
        elapsed_secs: secs,
        ticks_per_second: if secs > 0.0 { ticks as f64 / secs } else { 0.0 },
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

fn print_text_results(results: &BenchResults) {
    println!("\n=== Benchmark Results ===");
    println!("Games:        {}", results.games);
    println!("Total ticks:  {}", results.ticks);
    println!("Deaths:       {}", results.deaths);
    println!("Elapsed:      {:.2}s", results.elapsed_secs);
    println!("Throughput:   {:.0} ticks/s", results.ticks_per_second);
}

// ============================================================================
// TESTS
// ============================================================================
