//! Public entry point: setup, actions, queries, observations

use crate::config::{ActionSpace, EngineConfig};
use crate::error::{HexarioError, Result, ValidationError};
use crate::game::GameState;
use crate::hex::Direction;
use crate::observation::ObservationEncoder;
use crate::player::PlayerId;
use crate::render::{FrameSink, Snapshot};

/// A configured simulation
#[derive(Clone, Debug)]
pub struct Engine {
    config: EngineConfig,
    state: GameState,
    encoder: ObservationEncoder,
}

impl Engine {
    /// Validate the configuration and spawn every player
    pub fn setup(config: EngineConfig) -> Result<Self> {
        let state = GameState::new(&config)?;
        let encoder = ObservationEncoder::from_config(&config);

        tracing::info!(
            map_radius = config.map_radius,
            players = config.num_players,
            perspective = ?config.perspective,
            observation = ?config.observation,
            action_space = ?config.action_space,
            seed = config.seed_or_default(),
            "engine ready"
        );

        Ok(Self {
            config,
            state,
            encoder,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn num_players(&self) -> usize {
        self.state.num_players()
    }

    pub fn reset_player(&mut self, player: PlayerId) -> Result<()> {
        self.state.reset_player(player)
    }

    /// Apply one action per player and advance a tick. Every action is
    /// checked before anything moves.
    pub fn take_actions(&mut self, actions: &[f32]) -> Result<()> {
        let directions = self.decode_actions(actions)?;
        self.state.step(&directions)
    }

    fn decode_actions(&self, actions: &[f32]) -> Result<Vec<Direction>> {
        let expected = self.state.num_players();
        if actions.len() != expected {
            return Err(ValidationError::ActionCount {
                expected,
                actual: actions.len(),
            }
            .into());
        }

        let space = self.config.action_space;
        actions
            .iter()
            .enumerate()
            .map(|(player, &value)| {
                space.decode(value).ok_or_else(|| {
                    let err = match space {
                        ActionSpace::Discrete => ValidationError::DiscreteAction { player, value },
                        ActionSpace::Continuous => {
                            ValidationError::ContinuousAction { player, value }
                        }
                    };
                    HexarioError::from(err)
                })
            })
            .collect()
    }

    pub fn num_kills(&self, player: PlayerId) -> Result<u32> {
        self.state.num_kills(player)
    }

    pub fn num_captures(&self, player: PlayerId) -> Result<u32> {
        self.state.num_captures(player)
    }

    pub fn num_claims(&self, player: PlayerId) -> Result<u32> {
        self.state.num_claims(player)
    }

    pub fn is_dead(&self, player: PlayerId) -> Result<bool> {
        self.state.is_dead(player)
    }

    pub fn is_winner(&self, player: PlayerId) -> Result<bool> {
        self.state.is_winner(player)
    }

    pub fn distances(&self, player: PlayerId) -> Result<[u32; 6]> {
        self.state.distances(player)
    }

    pub fn observation_len(&self) -> usize {
        self.encoder.len()
    }

    pub fn observation(&self, player: PlayerId) -> Result<Vec<f32>> {
        self.encoder.encode(&self.state, player)
    }

    /// Write the player's observation into `buf`, which must be exactly
    /// [`observation_len`](Self::observation_len) long
    pub fn observe_into(&self, player: PlayerId, buf: &mut [f32]) -> Result<()> {
        self.encoder.encode_into(&self.state, player, buf)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Hand the current frame to a renderer; true if it asked to quit
    pub fn show(&self, sink: &mut dyn FrameSink) -> bool {
        sink.present(&self.snapshot())
    }
}
