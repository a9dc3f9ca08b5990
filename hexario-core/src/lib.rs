//! HEXARIO Core - Territory capture engine
//!
//! This crate provides the native simulation for HEXARIO:
//! - Board geometry (hex grid with axial coordinates)
//! - Tile ownership with claim/capture transitions
//! - Player movement and simultaneous collision resolution
//! - Per-player observations (feature codes or rasterized pixels)
//! - A renderer seam for external display surfaces

pub mod hex;
pub mod error;
pub mod config;
pub mod player;
pub mod board;
pub mod collision;
pub mod game;
pub mod raster;
pub mod observation;
pub mod render;
pub mod engine;

// Re-exports for convenient access
pub use hex::{hex_area, area_index, area_size, Direction, Hex, Point, CENTER, DIRECTIONS};
pub use error::{ConfigError, HexarioError, InvariantViolation, Result, ValidationError};
pub use config::{ActionSpace, EngineConfig, ObservationKind, Perspective, WinRule, DEFAULT_SEED};
pub use player::{Counters, Player, PlayerId};
pub use board::{Board, CaptureReport, CaptureTrigger, Cell, Tile, TileState};
pub use collision::{CollisionResolver, TickEvent};
pub use game::GameState;
pub use observation::{FeatureCode, ObservationEncoder};
pub use render::{FrameSink, RecordingSink, Snapshot};
pub use engine::Engine;
