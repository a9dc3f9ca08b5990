//! Error taxonomy for the engine

use thiserror::Error;

use crate::hex::Hex;
use crate::player::PlayerId;

/// Invalid setup parameters. The engine is never constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("map radius must be greater than 2, got {0}")]
    MapRadius(u32),

    #[error("at least one player is required")]
    NoPlayers,

    #[error("observation radius must be at least 2 for feature observations, got {0}")]
    ObservationRadius(u32),

    #[error("pixel observation dimensions must be positive, got {width}x{height}")]
    PixelDimensions { width: u32, height: u32 },

    #[error("velocity must be in (0, 1], got {0}")]
    Velocity(f32),

    #[error("spawn radius {spawn_radius} does not fit a map of radius {map_radius}")]
    SpawnRadius { spawn_radius: u32, map_radius: u32 },

    #[error("coverage threshold must be in (0, 1], got {0}")]
    Coverage(f32),
}

/// Rejected per-call input. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("expected {expected} actions, got {actual}")]
    ActionCount { expected: usize, actual: usize },

    #[error("discrete action for player {player} must be an integer in [0, 5], got {value}")]
    DiscreteAction { player: PlayerId, value: f32 },

    #[error("continuous action for player {player} must be an angle in [0, 2pi), got {value}")]
    ContinuousAction { player: PlayerId, value: f32 },

    #[error("player {0} does not exist")]
    UnknownPlayer(PlayerId),

    #[error("observation buffer has length {actual}, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("expected {expected} spawn tiles, got {actual}")]
    SpawnCount { expected: usize, actual: usize },

    #[error("spawn tile {0:?} leaves no room for a home territory")]
    SpawnTile(Hex),
}

/// Internal consistency failure. Signals a bug, not bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("tile {0:?} is outside the playable area")]
    TileOutOfBounds(Hex),

    #[error("trail of player {player} references non-playable tile {tile:?}")]
    TrailOutOfBounds { player: PlayerId, tile: Hex },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HexarioError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

pub type Result<T> = std::result::Result<T, HexarioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: HexarioError = ConfigError::MapRadius(2).into();
        assert_eq!(
            err.to_string(),
            "configuration error: map radius must be greater than 2, got 2"
        );

        let err: HexarioError = ValidationError::ActionCount { expected: 2, actual: 3 }.into();
        assert!(matches!(err, HexarioError::Validation(_)));
        assert!(err.to_string().contains("expected 2 actions, got 3"));
    }
}
