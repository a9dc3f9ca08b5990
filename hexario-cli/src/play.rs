//! Play command - run one engine with scripted agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_engine(), play_game(), report_results()
//! - Level 3: play_tick(), respawn_dead(), summarize()
//! - Level 4: formatting utilities

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hexario_core::{Engine, EngineConfig, FrameSink, TickEvent};

use crate::ascii::AsciiSink;
use crate::policy::{agents_for, choose_actions, RandomAgent};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Clone, Debug)]
pub struct PlayArgs {
    /// Map radius (overrides the config file)
    #[arg(long)]
    pub radius: Option<u32>,

    /// Number of players (overrides the config file)
    #[arg(long)]
    pub players: Option<usize>,

    /// Tiles travelled per tick (overrides the config file)
    #[arg(long)]
    pub velocity: Option<f32>,

    /// Maximum ticks to simulate
    #[arg(long, default_value = "500")]
    pub max_steps: u64,

    /// Draw every frame in the terminal
    #[arg(long)]
    pub show: bool,

    /// Delay between drawn frames in milliseconds
    #[arg(long, default_value = "50")]
    pub frame_ms: u64,

    /// Respawn dead players instead of ending the game
    #[arg(long)]
    pub respawn: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Final state of one player
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PlayerSummary {
    pub id: usize,
    pub alive: bool,
    pub winner: bool,
    pub kills: u32,
    pub captures: u32,
    pub claims: u32,
    pub territory: usize,
    pub deaths: u32,
}

/// Outcome of a played game
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GameSummary {
    pub ticks: u64,
    pub total_tiles: usize,
    pub quit_by_renderer: bool,
    pub players: Vec<PlayerSummary>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Build the engine from config and flags
/// 2. Play until someone wins, everyone dies or time runs out
/// 3. Report results
pub fn run(args: PlayArgs, config: EngineConfig) -> Result<()> {
    let mut engine = setup_engine(&args, config)?;

    tracing::info!(
        "Starting game: radius {}, {} players, max {} ticks",
        engine.config().map_radius,
        engine.num_players(),
        args.max_steps
    );

    let summary = if args.show {
        let mut sink = AsciiSink::stdout(Duration::from_millis(args.frame_ms));
        play_game(&mut engine, &args, Some(&mut sink))?
    } else {
        play_game(&mut engine, &args, None)?
    };

    report_results(&summary, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Apply command-line overrides and set up the engine
pub fn setup_engine(args: &PlayArgs, mut config: EngineConfig) -> Result<Engine> {
    if let Some(radius) = args.radius {
        config.map_radius = radius;
    }
    if let Some(players) = args.players {
        config.num_players = players;
    }
    if let Some(velocity) = args.velocity {
        config.velocity = velocity;
    }

    Engine::setup(config).context("Invalid engine configuration")
}

/// Drive the engine with random agents
pub fn play_game(
    engine: &mut Engine,
    args: &PlayArgs,
    mut sink: Option<&mut dyn FrameSink>,
) -> Result<GameSummary> {
    let mut agents = agents_for(engine.num_players(), engine.config().seed_or_default());
    let mut deaths = vec![0u32; engine.num_players()];
    let mut quit = false;

    for _ in 0..args.max_steps {
        if let Some(sink) = sink.as_deref_mut() {
            if engine.show(sink) {
                quit = true;
                break;
            }
        }

        play_tick(engine, &mut agents, &mut deaths)?;

        if args.respawn {
            respawn_dead(engine, &mut agents)?;
        } else if game_over(engine)? {
            break;
        }
    }

    summarize(engine, &deaths, quit)
}

/// Report game results
fn report_results(summary: &GameSummary, args: &PlayArgs) {
    if args.json {
        print_json_results(summary);
    } else {
        print_text_results(summary);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Advance one tick and log its notable events
fn play_tick(engine: &mut Engine, agents: &mut [RandomAgent], deaths: &mut [u32]) -> Result<()> {
    let actions = choose_actions(engine, agents)?;
    engine.take_actions(&actions)?;

    for event in engine.state().last_events() {
        match event {
            TickEvent::Killed { victim, killer } => {
                deaths[*victim] += 1;
                tracing::info!("Tick {}: player {} killed by {:?}", engine.state().tick(), victim, killer);
            }
            TickEvent::Captured { player, trail, enclosed } => {
                tracing::debug!(
                    "Tick {}: player {} captured {} tiles",
                    engine.state().tick(),
                    player,
                    trail + enclosed
                );
            }
            _ => {}
        }
    }

    Ok(())
}

fn respawn_dead(engine: &mut Engine, agents: &mut [RandomAgent]) -> Result<()> {
    for (id, agent) in agents.iter_mut().enumerate() {
        if engine.is_dead(id)? {
            engine.reset_player(id)?;
            agent.reset();
        }
    }
    Ok(())
}

/// Everybody dead, or someone won
fn game_over(engine: &Engine) -> Result<bool> {
    let mut alive = 0;
    for id in 0..engine.num_players() {
        if engine.is_winner(id)? {
            return Ok(true);
        }
        if !engine.is_dead(id)? {
            alive += 1;
        }
    }
    Ok(alive == 0)
}

fn summarize(engine: &Engine, deaths: &[u32], quit_by_renderer: bool) -> Result<GameSummary> {
    let board = engine.state().board();
    let players = (0..engine.num_players())
        .map(|id| {
            Ok(PlayerSummary {
                id,
                alive: !engine.is_dead(id)?,
                winner: engine.is_winner(id)?,
                kills: engine.num_kills(id)?,
                captures: engine.num_captures(id)?,
                claims: engine.num_claims(id)?,
                territory: board.territory(id),
                deaths: deaths[id],
            })
        })
        .collect::<hexario_core::Result<Vec<_>>>()?;

    Ok(GameSummary {
        ticks: engine.state().tick(),
        total_tiles: board.num_tiles(),
        quit_by_renderer,
        players,
    })
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_json_results(summary: &GameSummary) {
    if let Ok(json) = serde_json::to_string_pretty(summary) {
        println!("{}", json);
    }
}

fn print_text_results(summary: &GameSummary) {
    println!("\n=== Game Results ===");
    println!("Ticks played: {}", summary.ticks);
    println!("Board tiles:  {}", summary.total_tiles);

    println!("\nPlayers:");
    for p in &summary.players {
        println!(
            "  Player {}: {}{} | territory {} ({:.1}%) | kills {} | captures {} | claims {} | deaths {}",
            p.id,
            if p.alive { "alive" } else { "dead" },
            if p.winner { ", WINNER" } else { "" },
            p.territory,
            percent(p.territory, summary.total_tiles),
            p.kills,
            p.captures,
            p.claims,
            p.deaths
        );
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
