//! Hex board: tile ownership map and claim/capture transitions
//!
//! Map for radius = 3 (two rings around the center are playable, the
//! third ring is the border):
//!
//! ```text
//!        (0,-3) ---------
//!           \
//!            \
//! (-3,0) ------------------- (3,0)
//!                  \
//!                   \
//!         ----------(0, 3)
//! ```
//!
//! Tiles live in a flat arena indexed in [`hex_area`] order (center first,
//! then rings outward), with a precomputed neighbor table so the capture
//! flood fill never recurses.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{InvariantViolation, Result};
use crate::hex::{area_size, hex_area, Direction, Hex, CENTER};
use crate::player::{Player, PlayerId};

/// Ownership class of a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileState {
    Neutral,
    Claimed,
    Captured,
}

/// A playable tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: Hex,
    /// Player who captured the tile
    owner: Option<PlayerId>,
    /// Player whose live trail runs over the tile
    claimed_by: Option<PlayerId>,
}

impl Tile {
    fn new(coord: Hex) -> Self {
        Self {
            coord,
            owner: None,
            claimed_by: None,
        }
    }

    pub fn state(&self) -> TileState {
        match (self.claimed_by, self.owner) {
            (Some(_), _) => TileState::Claimed,
            (None, Some(_)) => TileState::Captured,
            (None, None) => TileState::Neutral,
        }
    }

    /// Captor of the tile. A claimed tile keeps its previous captor, which
    /// it reverts to when the claim is released.
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn claimed_by(&self) -> Option<PlayerId> {
        self.claimed_by
    }

    /// Captured by `player` and not under anyone's trail
    pub fn is_captured_by(&self, player: PlayerId) -> bool {
        self.claimed_by.is_none() && self.owner == Some(player)
    }
}

/// Result of a tile lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell<'a> {
    Tile(&'a Tile),
    /// Anything at or beyond the map radius
    Border,
}

/// What closed the loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureTrigger {
    /// The head re-entered the player's own captured territory
    HomeReturn,
    /// The head re-entered a tile of its own trail
    SelfCrossing,
}

/// Outcome of a capture attempt
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureReport {
    /// Trail tiles converted to captured
    pub trail: usize,
    /// Tiles converted because the loop enclosed them
    pub enclosed: usize,
    /// Enclosed tiles that were part of another player's trail
    pub overrun: Vec<(PlayerId, Hex)>,
    /// Other players who lost captured tiles, ascending, no repeats
    pub displaced: Vec<PlayerId>,
}

impl CaptureReport {
    pub fn total(&self) -> usize {
        self.trail + self.enclosed
    }
}

/// Hex board state
#[derive(Clone, Debug)]
pub struct Board {
    radius: u32,
    tiles: Vec<Tile>,
    index: FxHashMap<Hex, usize>,
    /// Neighbor indices per tile, `None` where the neighbor is border
    neighbors: Vec<[Option<usize>; 6]>,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create an empty board with `radius` rings (including the center)
    pub fn new(radius: u32) -> Self {
        let coords = hex_area(CENTER, radius);
        let index: FxHashMap<Hex, usize> = coords
            .iter()
            .enumerate()
            .map(|(i, &hex)| (hex, i))
            .collect();

        let neighbors = coords
            .iter()
            .map(|hex| {
                let mut row = [None; 6];
                for dir in Direction::ALL {
                    row[dir.index()] = index.get(&hex.neighbor(dir)).copied();
                }
                row
            })
            .collect();

        Self {
            radius,
            tiles: coords.into_iter().map(Tile::new).collect(),
            index,
            neighbors,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of playable tiles, `1 + 3R(R-1)`
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_playable(&self, hex: Hex) -> bool {
        hex.distance_to_center() < self.radius as i32
    }

    pub fn is_border(&self, hex: Hex) -> bool {
        !self.is_playable(hex)
    }

    pub fn index_of(&self, hex: Hex) -> Option<usize> {
        self.index.get(&hex).copied()
    }

    pub fn tile(&self, hex: Hex) -> Option<&Tile> {
        self.index_of(hex).map(|i| &self.tiles[i])
    }

    /// Tile at `hex`, or the border sentinel outside the map
    pub fn tile_at(&self, hex: Hex) -> Cell<'_> {
        match self.tile(hex) {
            Some(tile) => Cell::Tile(tile),
            None => Cell::Border,
        }
    }

    pub fn owner(&self, hex: Hex) -> Option<PlayerId> {
        self.tile(hex).and_then(|t| t.owner)
    }

    pub fn claimant(&self, hex: Hex) -> Option<PlayerId> {
        self.tile(hex).and_then(|t| t.claimed_by)
    }

    pub fn is_captured_by(&self, hex: Hex, player: PlayerId) -> bool {
        self.tile(hex).is_some_and(|t| t.is_captured_by(player))
    }

    /// Number of tiles in a given state
    pub fn count(&self, state: TileState) -> usize {
        self.tiles.iter().filter(|t| t.state() == state).count()
    }

    /// Number of tiles captured by `player` (claimed-over tiles included)
    pub fn territory(&self, player: PlayerId) -> usize {
        self.tiles.iter().filter(|t| t.owner == Some(player)).count()
    }

    /// Tiles stepped from `from` along `dir` until the first border tile
    pub fn steps_to_border(&self, from: Hex, dir: Direction) -> u32 {
        let mut steps = 0;
        let mut current = from;
        loop {
            current = current.neighbor(dir);
            steps += 1;
            if self.is_border(current) {
                return steps;
            }
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Claim `hex` for `player` and append it to the trail.
    ///
    /// Returns `Ok(false)` without touching anything when the tile is
    /// already claimed by anyone (the caller resolves kills first) or is
    /// the player's own captured territory.
    pub fn claim(&mut self, hex: Hex, player: &mut Player) -> Result<bool> {
        let i = self
            .index_of(hex)
            .ok_or(InvariantViolation::TileOutOfBounds(hex))?;
        let tile = &mut self.tiles[i];

        if tile.claimed_by.is_some() || tile.owner == Some(player.id()) {
            return Ok(false);
        }

        tile.claimed_by = Some(player.id());
        player.push_trail(hex);
        Ok(true)
    }

    /// Drop claims on `tiles`; each reverts to its captor or to neutral
    pub fn release(&mut self, tiles: &[Hex]) {
        for &hex in tiles {
            if let Some(i) = self.index_of(hex) {
                self.tiles[i].claimed_by = None;
            }
        }
    }

    /// Capture every tile of `hex_area(center, rings)` for `player`.
    /// Live claims on those tiles are left in place.
    pub fn set_home(&mut self, center: Hex, rings: u32, player: PlayerId) -> Result<usize> {
        let area = hex_area(center, rings);
        for &hex in &area {
            let i = self
                .index_of(hex)
                .ok_or(InvariantViolation::TileOutOfBounds(hex))?;
            self.tiles[i].owner = Some(player);
        }
        Ok(area.len())
    }

    /// Close the loop formed by the player's trail.
    ///
    /// The trail and every tile it encloses together with the player's
    /// territory become captured. A self-crossing that encloses nothing
    /// releases the trail and captures nothing.
    pub fn try_capture(&mut self, player: &mut Player, trigger: CaptureTrigger) -> Result<CaptureReport> {
        let id = player.id();
        for &hex in player.trail() {
            if self.index_of(hex).is_none() {
                return Err(InvariantViolation::TrailOutOfBounds { player: id, tile: hex }.into());
            }
        }

        let enclosed = self.enclosed_by(id);
        let trail = player.take_trail();

        if trigger == CaptureTrigger::SelfCrossing && enclosed.is_empty() {
            self.release(&trail);
            return Ok(CaptureReport::default());
        }

        let mut displaced = Vec::new();
        for &hex in &trail {
            if let Some(i) = self.index_of(hex) {
                let tile = &mut self.tiles[i];
                displaced.extend(tile.owner.filter(|&o| o != id));
                tile.owner = Some(id);
                tile.claimed_by = None;
            }
        }

        let mut overrun = Vec::new();
        for &i in &enclosed {
            let tile = &mut self.tiles[i];
            if let Some(other) = tile.claimed_by {
                overrun.push((other, tile.coord));
            }
            displaced.extend(tile.owner.filter(|&o| o != id));
            tile.owner = Some(id);
            tile.claimed_by = None;
        }
        displaced.sort_unstable();
        displaced.dedup();

        let report = CaptureReport {
            trail: trail.len(),
            enclosed: enclosed.len(),
            overrun,
            displaced,
        };
        player.add_captures(report.total() as u32);
        Ok(report)
    }

    /// Tiles cut off from the map edge by the player's territory and trail.
    ///
    /// Breadth-first flood from every open tile on the outermost playable
    /// ring; whatever open tile is left unvisited is enclosed.
    pub fn enclosed_by(&self, player: PlayerId) -> Vec<usize> {
        let barrier: Vec<bool> = self
            .tiles
            .iter()
            .map(|t| t.owner == Some(player) || t.claimed_by == Some(player))
            .collect();

        let mut visited = barrier.clone();
        let mut queue = VecDeque::new();

        let outer_start = area_size(self.radius.saturating_sub(1));
        for i in outer_start..self.tiles.len() {
            if !visited[i] {
                visited[i] = true;
                queue.push_back(i);
            }
        }

        while let Some(i) = queue.pop_front() {
            for n in self.neighbors[i].iter().flatten() {
                if !visited[*n] {
                    visited[*n] = true;
                    queue.push_back(*n);
                }
            }
        }

        (0..self.tiles.len()).filter(|&i| !visited[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(i: usize) -> Direction {
        Direction::from_index(i).unwrap()
    }

    fn player_at(id: PlayerId, hex: Hex) -> Player {
        let mut p = Player::new(id);
        p.spawn(hex);
        p
    }

    #[test]
    fn test_tile_count() {
        for radius in 3..8 {
            let board = Board::new(radius);
            let r = radius as usize;
            assert_eq!(board.num_tiles(), 1 + 3 * r * (r - 1));
            assert_eq!(board.count(TileState::Neutral), board.num_tiles());
        }
    }

    #[test]
    fn test_tile_at_border() {
        let board = Board::new(3);
        assert!(matches!(board.tile_at(Hex::new(2, 0)), Cell::Tile(_)));
        assert_eq!(board.tile_at(Hex::new(3, 0)), Cell::Border);
        assert_eq!(board.tile_at(Hex::new(10, -40)), Cell::Border);
    }

    #[test]
    fn test_claim_is_idempotent() {
        let mut board = Board::new(4);
        let mut p = player_at(0, Hex::new(0, 0));

        assert!(board.claim(Hex::new(1, 0), &mut p).unwrap());
        assert!(!board.claim(Hex::new(1, 0), &mut p).unwrap());
        assert_eq!(p.trail(), &[Hex::new(1, 0)]);
        assert_eq!(board.tile(Hex::new(1, 0)).unwrap().state(), TileState::Claimed);
        assert_eq!(board.claimant(Hex::new(1, 0)), Some(0));
    }

    #[test]
    fn test_claim_outside_board_is_invariant_violation() {
        let mut board = Board::new(3);
        let mut p = player_at(0, Hex::new(0, 0));
        assert!(board.claim(Hex::new(5, 0), &mut p).is_err());
    }

    #[test]
    fn test_claim_over_enemy_territory_reverts_on_release() {
        let mut board = Board::new(4);
        board.set_home(Hex::new(0, 0), 2, 1).unwrap();
        let mut p = player_at(0, Hex::new(2, 0));

        assert!(board.claim(Hex::new(1, 0), &mut p).unwrap());
        assert_eq!(board.tile(Hex::new(1, 0)).unwrap().owner(), Some(1));

        let trail = p.kill();
        board.release(&trail);
        assert!(board.is_captured_by(Hex::new(1, 0), 1));
    }

    #[test]
    fn test_home_return_captures_trail_and_enclosure() {
        // walk a hexagon around (1,-1) starting and ending on home tile (0,0)
        let mut board = Board::new(4);
        board.set_home(Hex::new(0, 0), 1, 0).unwrap();
        let mut p = player_at(0, Hex::new(0, 0));

        let mut head = Hex::new(0, 0);
        for i in 0..5 {
            head = head.neighbor(dir(i));
            board.claim(head, &mut p).unwrap();
        }
        assert_eq!(p.trail().len(), 5);

        let report = board.try_capture(&mut p, CaptureTrigger::HomeReturn).unwrap();
        assert_eq!(report.trail, 5);
        assert_eq!(report.enclosed, 1);
        assert!(board.is_captured_by(Hex::new(1, -1), 0));
        assert!(p.trail().is_empty());
        assert_eq!(p.counters().captures, 6);
        assert_eq!(board.territory(0), 7);
    }

    #[test]
    fn test_capture_leaves_outside_untouched() {
        let mut board = Board::new(5);
        board.set_home(Hex::new(-2, 0), 1, 1).unwrap();
        board.set_home(Hex::new(0, 0), 1, 0).unwrap();
        let before: Vec<Tile> = board.tiles().to_vec();

        let mut p = player_at(0, Hex::new(0, 0));
        board.claim(Hex::new(1, 0), &mut p).unwrap();
        let report = board.try_capture(&mut p, CaptureTrigger::HomeReturn).unwrap();
        assert_eq!(report.total(), 1);

        let changed: Vec<Hex> = board
            .tiles()
            .iter()
            .zip(&before)
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a.coord)
            .collect();
        assert_eq!(changed, vec![Hex::new(1, 0)]);
        assert!(board.is_captured_by(Hex::new(-2, 0), 1));
    }

    #[test]
    fn test_self_crossing_without_enclosure_releases_trail() {
        let mut board = Board::new(5);
        let mut p = player_at(0, Hex::new(0, 0));
        board.claim(Hex::new(1, 0), &mut p).unwrap();
        board.claim(Hex::new(2, 0), &mut p).unwrap();

        let report = board.try_capture(&mut p, CaptureTrigger::SelfCrossing).unwrap();
        assert_eq!(report, CaptureReport::default());
        assert!(p.trail().is_empty());
        assert_eq!(board.count(TileState::Neutral), board.num_tiles());
        assert_eq!(p.counters().captures, 0);
    }

    #[test]
    fn test_enclosure_overruns_enemy_trail() {
        let mut board = Board::new(5);
        board.set_home(Hex::new(0, 0), 1, 0).unwrap();
        let mut enemy = player_at(1, Hex::new(1, -1));
        board.claim(Hex::new(1, -1), &mut enemy).unwrap();

        let mut p = player_at(0, Hex::new(0, 0));
        let mut head = Hex::new(0, 0);
        for i in 0..5 {
            head = head.neighbor(dir(i));
            board.claim(head, &mut p).unwrap();
        }

        let report = board.try_capture(&mut p, CaptureTrigger::HomeReturn).unwrap();
        assert_eq!(report.overrun, vec![(1, Hex::new(1, -1))]);
        assert!(report.displaced.is_empty());
        assert!(board.is_captured_by(Hex::new(1, -1), 0));
    }

    #[test]
    fn test_enclosing_enemy_territory_reports_displaced_owner() {
        let mut board = Board::new(5);
        board.set_home(Hex::new(0, 0), 1, 0).unwrap();
        board.set_home(Hex::new(1, -1), 1, 1).unwrap();

        let mut p = player_at(0, Hex::new(0, 0));
        let mut head = Hex::new(0, 0);
        for i in 0..5 {
            head = head.neighbor(dir(i));
            board.claim(head, &mut p).unwrap();
        }

        let report = board.try_capture(&mut p, CaptureTrigger::HomeReturn).unwrap();
        assert_eq!(report.enclosed, 1);
        assert_eq!(report.displaced, vec![1]);
        assert_eq!(board.territory(1), 0);
    }

    #[test]
    fn test_border_does_not_enclose() {
        // a trail hugging the outer ring leaves the strip behind it open
        let mut board = Board::new(3);
        board.set_home(Hex::new(0, 0), 1, 0).unwrap();
        assert!(board.enclosed_by(0).is_empty());

        let mut p = player_at(0, Hex::new(0, 0));
        board.claim(Hex::new(1, 0), &mut p).unwrap();
        board.claim(Hex::new(2, -1), &mut p).unwrap();
        assert!(board.enclosed_by(0).is_empty());
    }

    #[test]
    fn test_steps_to_border() {
        let board = Board::new(4);
        for d in Direction::ALL {
            assert_eq!(board.steps_to_border(Hex::new(0, 0), d), 4);
        }
        assert_eq!(board.steps_to_border(Hex::new(3, 0), dir(0)), 1);
        assert_eq!(board.steps_to_border(Hex::new(3, 0), dir(3)), 7);
    }
}
