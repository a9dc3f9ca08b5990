//! Per-agent state and local movement

use serde::{Deserialize, Serialize};

use crate::hex::{Direction, Hex, Point};

/// Player index, 0..num_players
pub type PlayerId = usize;

/// Per-player counters. Non-decreasing between resets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub kills: u32,
    pub captures: u32,
    pub claims: u32,
}

/// Movement computed for one tick, before it is applied
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub heading: Direction,
    pub progress: f32,
    /// Tile entered this tick, if the accumulator crossed a boundary
    pub enters: Option<Hex>,
}

/// An agent on the board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    alive: bool,
    head: Hex,
    heading: Direction,
    /// Distance travelled towards the next tile, in [0, 1)
    progress: f32,
    /// Tiles claimed since the last capture or death, in claim order
    trail: Vec<Hex>,
    counters: Counters,
}

impl Player {
    /// Players start dead until their first spawn
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            alive: false,
            head: Hex::default(),
            heading: Direction::default(),
            progress: 0.0,
            trail: Vec::new(),
            counters: Counters::default(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    /// Tile currently occupied by the player
    pub fn head(&self) -> Hex {
        self.head
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn trail(&self) -> &[Hex] {
        &self.trail
    }

    pub fn has_claimed(&self, tile: Hex) -> bool {
        self.trail.contains(&tile)
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Continuous position between the head and the next tile
    pub fn position(&self) -> Point {
        self.head
            .to_point()
            .add_scaled(self.heading.step_vector(), self.progress)
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    /// Compute the move for this tick without applying it
    pub fn propose_step(&self, direction: Direction, velocity: f32) -> Step {
        if !self.alive {
            return Step {
                heading: self.heading,
                progress: self.progress,
                enters: None,
            };
        }

        let progress = self.progress + velocity;
        if progress >= 1.0 {
            Step {
                heading: direction,
                progress: progress - 1.0,
                enters: Some(self.head.neighbor(direction)),
            }
        } else {
            Step {
                heading: direction,
                progress,
                enters: None,
            }
        }
    }

    /// Apply a previously proposed step
    pub fn commit(&mut self, step: Step) {
        if !self.alive {
            return;
        }
        self.heading = step.heading;
        self.progress = step.progress;
        if let Some(tile) = step.enters {
            self.head = tile;
        }
    }

    /// Advance along `direction`; returns the newly entered tile, if any
    pub fn apply_direction(&mut self, direction: Direction, velocity: f32) -> Option<Hex> {
        let step = self.propose_step(direction, velocity);
        self.commit(step);
        step.enters
    }

    /// Movement refused at the border: stay on the head tile
    pub fn block(&mut self, heading: Direction) {
        self.heading = heading;
        self.progress = 0.0;
    }

    // ========================================================================
    // TRAIL & COUNTERS
    // ========================================================================

    /// Append a claimed tile; returns false if it was already in the trail
    pub fn push_trail(&mut self, tile: Hex) -> bool {
        if self.trail.contains(&tile) {
            return false;
        }
        self.trail.push(tile);
        self.counters.claims += 1;
        true
    }

    /// Empty the trail, handing back its tiles
    pub fn take_trail(&mut self) -> Vec<Hex> {
        std::mem::take(&mut self.trail)
    }

    /// Drop tiles that were taken over by someone else's capture
    pub fn forget_trail_tiles(&mut self, lost: impl Fn(Hex) -> bool) {
        self.trail.retain(|&tile| !lost(tile));
    }

    pub fn add_kill(&mut self) {
        self.counters.kills += 1;
    }

    pub fn add_captures(&mut self, tiles: u32) {
        self.counters.captures += tiles;
    }

    /// Mark dead; the trail is returned uncaptured so the board can release it
    pub fn kill(&mut self) -> Vec<Hex> {
        self.alive = false;
        self.progress = 0.0;
        self.take_trail()
    }

    /// Bring the player (back) to life at `tile`, counters zeroed
    pub fn spawn(&mut self, tile: Hex) {
        self.alive = true;
        self.head = tile;
        self.heading = Direction::default();
        self.progress = 0.0;
        self.trail.clear();
        self.counters = Counters::default();
    }
}
