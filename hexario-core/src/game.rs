//! Game state and tick orchestration

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, CaptureTrigger};
use crate::collision::{kill_player, CollisionResolver, Outcome, TickEvent};
use crate::config::{EngineConfig, WinRule};
use crate::error::{Result, ValidationError};
use crate::hex::{hex_area, Direction, Hex, CENTER};
use crate::player::{Counters, Player, PlayerId};
use crate::render::Snapshot;

// ============================================================================
// GAME STATE
// ============================================================================

/// Board, players and the per-tick rules binding them
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    players: Vec<Player>,
    velocity: f32,
    /// Rings of home territory around a spawn tile, center excluded
    spawn_radius: u32,
    win_rule: WinRule,
    rng: ChaCha8Rng,
    /// Ticks stepped so far
    tick: u64,
    /// Events of the most recent tick
    events: Vec<TickEvent>,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a game and spawn every player
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let mut state = Self::unspawned(config)?;
        for id in 0..config.num_players {
            state.reset_player(id)?;
        }

        Ok(state)
    }

    /// Create a game with every player spawned at a fixed tile
    pub fn with_spawns(config: &EngineConfig, spawns: &[Hex]) -> Result<Self> {
        let mut state = Self::unspawned(config)?;
        if spawns.len() != config.num_players {
            return Err(ValidationError::SpawnCount {
                expected: config.num_players,
                actual: spawns.len(),
            }
            .into());
        }

        for (id, &tile) in spawns.iter().enumerate() {
            state.spawn_player_at(id, tile)?;
        }

        Ok(state)
    }

    /// Validated empty board, every player still dead
    fn unspawned(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            board: Board::new(config.map_radius),
            players: (0..config.num_players).map(Player::new).collect(),
            velocity: config.velocity,
            spawn_radius: config.spawn_radius,
            win_rule: config.win_rule,
            rng: ChaCha8Rng::seed_from_u64(config.seed_or_default()),
            tick: 0,
            events: Vec::new(),
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(id)
            .ok_or_else(|| ValidationError::UnknownPlayer(id).into())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Events produced by the last [`step`](Self::step)
    pub fn last_events(&self) -> &[TickEvent] {
        &self.events
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Owned copy of tiles and players
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            map_radius: self.board.radius(),
            tick: self.tick,
            tiles: self.board.tiles().to_vec(),
            players: self.players.clone(),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn counters(&self, id: PlayerId) -> Result<Counters> {
        Ok(self.player(id)?.counters())
    }

    pub fn num_kills(&self, id: PlayerId) -> Result<u32> {
        Ok(self.counters(id)?.kills)
    }

    pub fn num_captures(&self, id: PlayerId) -> Result<u32> {
        Ok(self.counters(id)?.captures)
    }

    pub fn num_claims(&self, id: PlayerId) -> Result<u32> {
        Ok(self.counters(id)?.claims)
    }

    pub fn is_dead(&self, id: PlayerId) -> Result<bool> {
        Ok(self.player(id)?.is_dead())
    }

    /// Winner under the configured rule; owning the whole board always wins
    pub fn is_winner(&self, id: PlayerId) -> Result<bool> {
        let player = self.player(id)?;
        if player.is_dead() {
            return Ok(false);
        }

        let territory = self.board.territory(id);
        if territory == self.board.num_tiles() {
            return Ok(true);
        }

        Ok(match self.win_rule {
            WinRule::LastSurvivor => {
                self.players.len() > 1 && self.players.iter().filter(|p| p.is_alive()).count() == 1
            }
            WinRule::Coverage(share) => {
                territory as f32 / self.board.num_tiles() as f32 >= share
            }
        })
    }

    /// Winner under a caller-supplied rule
    pub fn is_winner_by<F>(&self, id: PlayerId, predicate: F) -> Result<bool>
    where
        F: Fn(&GameState, &Player) -> bool,
    {
        let player = self.player(id)?;
        Ok(predicate(self, player))
    }

    /// Steps from the player's head to the border along each axis
    pub fn distances(&self, id: PlayerId) -> Result<[u32; 6]> {
        Ok(CollisionResolver::distances(&self.board, self.player(id)?))
    }

    // ========================================================================
    // SPAWNING
    // ========================================================================

    /// Respawn a player at a fresh tile. Its trail is released, its
    /// captured territory stays on the board, its counters restart at zero.
    pub fn reset_player(&mut self, id: PlayerId) -> Result<()> {
        self.player(id)?;
        let tile = self.pick_spawn_tile(id);
        self.spawn_player_at(id, tile)
    }

    /// Respawn a player at a specific tile
    pub fn spawn_player_at(&mut self, id: PlayerId, tile: Hex) -> Result<()> {
        self.player(id)?;
        if tile.distance_to_center() + self.spawn_radius as i32 >= self.board.radius() as i32 {
            return Err(ValidationError::SpawnTile(tile).into());
        }

        let trail = self.players[id].take_trail();
        self.board.release(&trail);

        self.players[id].spawn(tile);
        self.board.set_home(tile, self.spawn_radius + 1, id)?;

        tracing::debug!(player = id, q = tile.q, r = tile.r, "player spawned");
        Ok(())
    }

    /// Random free tile near the center, widening the zone if crowded
    fn pick_spawn_tile(&mut self, id: PlayerId) -> Hex {
        let outer = self.board.radius() - 1 - self.spawn_radius;
        let inner = self.board.radius().saturating_sub(3).min(outer);

        for zone in [inner, outer] {
            let candidates: Vec<Hex> = hex_area(CENTER, zone + 1)
                .into_iter()
                .filter(|&hex| self.is_free_spawn(id, hex))
                .collect();
            if !candidates.is_empty() {
                return candidates[self.rng.gen_range(0..candidates.len())];
            }
        }

        // every tile is claimed: settle for one without a head on it, and
        // only when heads cover the whole zone share a tile
        let zone = hex_area(CENTER, outer + 1);
        let unoccupied: Vec<Hex> = zone
            .iter()
            .copied()
            .filter(|&hex| !self.is_head_of_other(id, hex))
            .collect();
        let pool = if unoccupied.is_empty() { zone } else { unoccupied };
        pool[self.rng.gen_range(0..pool.len())]
    }

    fn is_free_spawn(&self, id: PlayerId, hex: Hex) -> bool {
        self.board.claimant(hex).is_none() && !self.is_head_of_other(id, hex)
    }

    fn is_head_of_other(&self, id: PlayerId, hex: Hex) -> bool {
        self.players
            .iter()
            .any(|p| p.id() != id && p.is_alive() && p.head() == hex)
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Advance one tick with one direction per player (ignored for dead
    /// players). Fails before mutating anything if the count is wrong.
    pub fn step(&mut self, directions: &[Direction]) -> Result<()> {
        if directions.len() != self.players.len() {
            return Err(ValidationError::ActionCount {
                expected: self.players.len(),
                actual: directions.len(),
            }
            .into());
        }

        self.events.clear();
        let proposals = CollisionResolver::propose(&self.players, directions, self.velocity);

        for id in 0..self.players.len() {
            let outcome = CollisionResolver::resolve_move(
                &mut self.board,
                &mut self.players,
                &proposals,
                id,
                &mut self.events,
            );
            if let Outcome::Entered(tile) = outcome {
                self.occupy(id, tile)?;
            }
        }

        self.tick += 1;
        Ok(())
    }

    /// Territory update for a player whose head just entered `tile`
    fn occupy(&mut self, id: PlayerId, tile: Hex) -> Result<()> {
        if self.board.claimant(tile) == Some(id) {
            return self.capture(id, CaptureTrigger::SelfCrossing);
        }

        if self.board.is_captured_by(tile, id) {
            if !self.players[id].trail().is_empty() {
                return self.capture(id, CaptureTrigger::HomeReturn);
            }
            return Ok(());
        }

        if self.board.claim(tile, &mut self.players[id])? {
            tracing::trace!(player = id, q = tile.q, r = tile.r, "tile claimed");
            self.events.push(TickEvent::Claimed { player: id, tile });
        }
        Ok(())
    }

    fn capture(&mut self, id: PlayerId, trigger: CaptureTrigger) -> Result<()> {
        let report = self.board.try_capture(&mut self.players[id], trigger)?;

        for &(other, hex) in &report.overrun {
            self.players[other].forget_trail_tiles(|t| t == hex);
        }

        if report.total() > 0 {
            tracing::debug!(
                player = id,
                trail = report.trail,
                enclosed = report.enclosed,
                ?trigger,
                "territory captured"
            );
            self.events.push(TickEvent::captured(id, &report));
        }

        // a player left without any territory is surrounded and dies
        for &prev in &report.displaced {
            if self.players[prev].is_alive() && self.board.territory(prev) == 0 {
                kill_player(&mut self.board, &mut self.players, prev, Some(id), &mut self.events);
            }
        }
        Ok(())
    }

    /// Remove a player from play without crediting anyone
    pub fn eliminate(&mut self, id: PlayerId) -> Result<()> {
        if self.player(id)?.is_alive() {
            kill_player(&mut self.board, &mut self.players, id, None, &mut self.events);
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
