//! Engine configuration
//!
//! The mode (perspective x observation type x action space) is fixed here
//! at setup and never re-selected per call.

use std::f32::consts::TAU;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hex::{area_size, Direction};

/// Default RNG seed for spawn placement
pub const DEFAULT_SEED: u64 = 42;

/// Observation framing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    /// Radius-bounded neighborhood centered on the player
    #[default]
    Local,
    /// Whole board
    Global,
}

/// Observation artifact
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationKind {
    /// One ownership code per tile
    #[default]
    Features,
    /// Rasterized RGB image
    Pixels,
}

/// How actions are interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionSpace {
    /// Integer axis index in [0, 5]
    #[default]
    Discrete,
    /// Heading angle in [0, 2pi), snapped to the nearest axis
    Continuous,
}

impl ActionSpace {
    /// Decode one raw action; `None` if it is out of range
    pub fn decode(self, value: f32) -> Option<Direction> {
        if !value.is_finite() {
            return None;
        }
        match self {
            ActionSpace::Discrete => {
                if value.fract() != 0.0 || !(0.0..=5.0).contains(&value) {
                    return None;
                }
                Direction::from_index(value as usize)
            }
            ActionSpace::Continuous => {
                if !(0.0..TAU).contains(&value) {
                    return None;
                }
                Some(Direction::nearest(value))
            }
        }
    }
}

/// Who counts as a winner
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRule {
    /// The only living player among two or more
    #[default]
    LastSurvivor,
    /// A living player owning at least this share of the board
    Coverage(f32),
}

/// Setup parameters for an [`Engine`](crate::Engine)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rings of playable tiles, center included
    pub map_radius: u32,
    pub num_players: usize,
    pub perspective: Perspective,
    pub observation: ObservationKind,
    pub action_space: ActionSpace,
    /// Rings visible to a player, center included
    pub observation_radius: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Tiles travelled per tick
    pub velocity: f32,
    /// Rings of home territory around a spawn tile, center excluded
    pub spawn_radius: u32,
    pub win_rule: WinRule,
    /// Spawn placement seed (None = DEFAULT_SEED)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map_radius: 10,
            num_players: 1,
            perspective: Perspective::Local,
            observation: ObservationKind::Features,
            action_space: ActionSpace::Discrete,
            observation_radius: 5,
            pixel_width: 84,
            pixel_height: 84,
            velocity: 0.1,
            spawn_radius: 1,
            win_rule: WinRule::LastSurvivor,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Config for a map of `map_radius` with `num_players`
    pub fn new(map_radius: u32, num_players: usize) -> Self {
        Self {
            map_radius,
            num_players,
            ..Default::default()
        }
    }

    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspective = perspective;
        self
    }

    pub fn with_observation(mut self, observation: ObservationKind) -> Self {
        self.observation = observation;
        self
    }

    pub fn with_action_space(mut self, action_space: ActionSpace) -> Self {
        self.action_space = action_space;
        self
    }

    pub fn with_observation_radius(mut self, radius: u32) -> Self {
        self.observation_radius = radius;
        self
    }

    pub fn with_pixels(mut self, width: u32, height: u32) -> Self {
        self.pixel_width = width;
        self.pixel_height = height;
        self
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_spawn_radius(mut self, spawn_radius: u32) -> Self {
        self.spawn_radius = spawn_radius;
        self
    }

    pub fn with_win_rule(mut self, win_rule: WinRule) -> Self {
        self.win_rule = win_rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seed_or_default(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Check every parameter; the first problem found is reported
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_radius <= 2 {
            return Err(ConfigError::MapRadius(self.map_radius));
        }
        if self.num_players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.observation == ObservationKind::Features && self.observation_radius < 2 {
            return Err(ConfigError::ObservationRadius(self.observation_radius));
        }
        if self.observation == ObservationKind::Pixels
            && (self.pixel_width == 0 || self.pixel_height == 0)
        {
            return Err(ConfigError::PixelDimensions {
                width: self.pixel_width,
                height: self.pixel_height,
            });
        }
        if !(self.velocity > 0.0 && self.velocity <= 1.0) {
            return Err(ConfigError::Velocity(self.velocity));
        }
        // the home area around a spawn tile must fit inside the playable rings
        if self.spawn_radius + 2 > self.map_radius {
            return Err(ConfigError::SpawnRadius {
                spawn_radius: self.spawn_radius,
                map_radius: self.map_radius,
            });
        }
        if let WinRule::Coverage(share) = self.win_rule {
            if !(share > 0.0 && share <= 1.0) {
                return Err(ConfigError::Coverage(share));
            }
        }
        Ok(())
    }

    /// Playable tiles on the board
    pub fn num_tiles(&self) -> usize {
        area_size(self.map_radius)
    }

    /// Length of one observation for this configuration
    pub fn observation_len(&self) -> usize {
        match (self.observation, self.perspective) {
            (ObservationKind::Features, Perspective::Local) => area_size(self.observation_radius),
            (ObservationKind::Features, Perspective::Global) => self.num_tiles(),
            (ObservationKind::Pixels, _) => {
                self.pixel_width as usize * self.pixel_height as usize * 3
            }
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }
}
