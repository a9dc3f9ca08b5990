//! Scripted agents
//!
//! Agents live outside the engine: they only see what any environment
//! adapter sees (distances, observations) and answer with raw actions.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexario_core::{Engine, Result};

/// Chance of keeping the previous heading when it is still open
pub const DEFAULT_PERSISTENCE: f64 = 0.8;

/// Random walker that avoids running into the border.
///
/// Any axis with more than one step of room is allowed; the previous axis
/// is kept with probability `persistence` so the walk makes loops instead
/// of jittering in place.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: ChaCha8Rng,
    persistence: f64,
    last: Option<usize>,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self::with_persistence(seed, DEFAULT_PERSISTENCE)
    }

    pub fn with_persistence(seed: u64, persistence: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            persistence: persistence.clamp(0.0, 1.0),
            last: None,
        }
    }

    /// Pick an axis index given the steps to the border along each axis
    pub fn choose(&mut self, distances: &[u32; 6]) -> usize {
        let open: Vec<usize> = (0..6).filter(|&i| distances[i] > 1).collect();

        if let Some(last) = self.last {
            if open.contains(&last) && self.rng.gen_bool(self.persistence) {
                return last;
            }
        }

        let choice = if open.is_empty() {
            self.rng.gen_range(0..6)
        } else {
            open[self.rng.gen_range(0..open.len())]
        };
        self.last = Some(choice);
        choice
    }

    /// Forget the previous heading, e.g. after a respawn
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// One agent per player, seeded from a shared base seed
pub fn agents_for(players: usize, base_seed: u64) -> Vec<RandomAgent> {
    (0..players)
        .map(|id| RandomAgent::new(base_seed.wrapping_add(id as u64 + 1)))
        .collect()
}

/// Discrete actions for every player of `engine`
pub fn choose_actions(engine: &Engine, agents: &mut [RandomAgent]) -> Result<Vec<f32>> {
    agents
        .iter_mut()
        .enumerate()
        .map(|(id, agent)| Ok(agent.choose(&engine.distances(id)?) as f32))
        .collect()
}
