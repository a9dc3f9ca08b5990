//! Rendering seam
//!
//! The engine never draws anything itself. A [`FrameSink`] receives a
//! [`Snapshot`] of the game and decides how to present it (terminal,
//! JSON stream, window...).

use serde::{Deserialize, Serialize};

use crate::board::{Tile, TileState};
use crate::hex::{area_index, Hex};
use crate::player::{Player, PlayerId};

/// Owned copy of everything needed to draw one frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub map_radius: u32,
    pub tick: u64,
    pub tiles: Vec<Tile>,
    pub players: Vec<Player>,
}

impl Snapshot {
    /// Tiles are stored in [`hex_area`](crate::hex::hex_area) order, so
    /// lookup is direct
    pub fn tile(&self, hex: Hex) -> Option<&Tile> {
        if hex.distance_to_center() >= self.map_radius as i32 {
            return None;
        }
        area_index(hex)
            .and_then(|i| self.tiles.get(i))
            .filter(|t| t.coord == hex)
    }

    /// Living player whose head is on `hex`
    pub fn head_at(&self, hex: Hex) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.is_alive() && p.head() == hex)
            .map(Player::id)
    }

    pub fn count(&self, state: TileState) -> usize {
        self.tiles.iter().filter(|t| t.state() == state).count()
    }

    pub fn alive(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }
}

/// Consumer of rendered frames
pub trait FrameSink {
    /// Present one frame; returns true when the sink asks to quit
    fn present(&mut self, frame: &Snapshot) -> bool;
}

/// Keeps every frame it is given
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Snapshot>,
    /// Ask to quit once this many frames have been recorded
    pub quit_after: Option<usize>,
}

impl FrameSink for RecordingSink {
    fn present(&mut self, frame: &Snapshot) -> bool {
        self.frames.push(frame.clone());
        self.quit_after.is_some_and(|n| self.frames.len() >= n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::game::GameState;
    use crate::hex::CENTER;

    #[test]
    fn test_snapshot_lookup() {
        let state = GameState::with_spawns(&EngineConfig::new(4, 1), &[CENTER]).unwrap();
        let snap = state.snapshot();
        assert_eq!(snap.map_radius, 4);
        assert_eq!(snap.tiles.len(), 37);
        assert_eq!(snap.head_at(CENTER), Some(0));
        assert_eq!(snap.tile(CENTER).unwrap().owner(), Some(0));
        assert_eq!(snap.count(TileState::Captured), 7);
        assert_eq!(snap.alive(), 1);
    }

    #[test]
    fn test_snapshot_tile_lookup_covers_board() {
        let state = GameState::with_spawns(&EngineConfig::new(5, 1), &[CENTER]).unwrap();
        let snap = state.snapshot();
        for tile in state.board().tiles() {
            assert_eq!(snap.tile(tile.coord), Some(tile));
        }
        assert_eq!(snap.tile(Hex::new(5, 0)), None);
        assert_eq!(snap.tile(Hex::new(-3, -3)), None);
    }

    #[test]
    fn test_snapshot_json() {
        let state = GameState::with_spawns(&EngineConfig::new(3, 1), &[CENTER]).unwrap();
        let snap = state.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_recording_sink_quits() {
        let state = GameState::with_spawns(&EngineConfig::new(3, 1), &[CENTER]).unwrap();
        let mut sink = RecordingSink {
            quit_after: Some(2),
            ..Default::default()
        };
        assert!(!sink.present(&state.snapshot()));
        assert!(sink.present(&state.snapshot()));
        assert_eq!(sink.frames.len(), 2);
    }
}
