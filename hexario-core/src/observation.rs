//! Per-player observations
//!
//! One encoder is chosen at setup from the perspective and observation
//! kind; it writes into a caller-supplied buffer so the hot path never
//! allocates.
//!
//! Feature codes, one per tile:
//!
//! | code | meaning                   |
//! |------|---------------------------|
//! | -1   | hidden (global view only) |
//! | 0    | neutral                   |
//! | 2/3/4| own claim/capture/head    |
//! | 5/6/7| enemy claim/capture/head  |
//! | 8    | border                    |
//!
//! A head overrides a claim, a claim overrides a capture.

use crate::config::{EngineConfig, ObservationKind, Perspective};
use crate::error::{Result, ValidationError};
use crate::game::GameState;
use crate::hex::{area_size, hex_area, Hex};
use crate::player::PlayerId;
use crate::raster::Rasterizer;

/// Tile classification from one player's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureCode {
    Hidden,
    Neutral,
    OwnClaim,
    OwnCapture,
    OwnPosition,
    EnemyClaim,
    EnemyCapture,
    EnemyPosition,
    Border,
}

impl FeatureCode {
    pub fn value(self) -> f32 {
        match self {
            FeatureCode::Hidden => -1.0,
            FeatureCode::Neutral => 0.0,
            FeatureCode::OwnClaim => 2.0,
            FeatureCode::OwnCapture => 3.0,
            FeatureCode::OwnPosition => 4.0,
            FeatureCode::EnemyClaim => 5.0,
            FeatureCode::EnemyCapture => 6.0,
            FeatureCode::EnemyPosition => 7.0,
            FeatureCode::Border => 8.0,
        }
    }

    /// Classify `hex` as seen by `viewer`
    pub fn classify(state: &GameState, viewer: PlayerId, hex: Hex) -> Self {
        let Some(tile) = state.board().tile(hex) else {
            return FeatureCode::Border;
        };

        if let Some(p) = state.players().iter().find(|p| p.is_alive() && p.head() == hex) {
            return if p.id() == viewer {
                FeatureCode::OwnPosition
            } else {
                FeatureCode::EnemyPosition
            };
        }

        match (tile.claimed_by(), tile.owner()) {
            (Some(c), _) if c == viewer => FeatureCode::OwnClaim,
            (Some(_), _) => FeatureCode::EnemyClaim,
            (None, Some(o)) if o == viewer => FeatureCode::OwnCapture,
            (None, Some(_)) => FeatureCode::EnemyCapture,
            (None, None) => FeatureCode::Neutral,
        }
    }
}

/// Observation strategy, fixed at setup
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObservationEncoder {
    /// Codes for the tiles within `radius` rings of the head
    LocalFeatures { radius: u32 },
    /// Codes for every playable tile, hidden beyond `radius` of the head
    GlobalFeatures { radius: u32, tiles: usize },
    /// Image centered on the head
    LocalPixels { raster: Rasterizer, radius: u32 },
    /// Image of the whole board, greyed beyond `radius` of the head
    GlobalPixels { raster: Rasterizer, radius: u32 },
}

impl ObservationEncoder {
    pub fn from_config(config: &EngineConfig) -> Self {
        let radius = config.observation_radius;
        let raster = Rasterizer::new(config.pixel_width, config.pixel_height);

        match (config.observation, config.perspective) {
            (ObservationKind::Features, Perspective::Local) => {
                ObservationEncoder::LocalFeatures { radius }
            }
            (ObservationKind::Features, Perspective::Global) => ObservationEncoder::GlobalFeatures {
                radius,
                tiles: config.num_tiles(),
            },
            (ObservationKind::Pixels, Perspective::Local) => {
                ObservationEncoder::LocalPixels { raster, radius }
            }
            (ObservationKind::Pixels, Perspective::Global) => {
                ObservationEncoder::GlobalPixels { raster, radius }
            }
        }
    }

    /// Length of one observation
    pub fn len(&self) -> usize {
        match *self {
            ObservationEncoder::LocalFeatures { radius } => area_size(radius),
            ObservationEncoder::GlobalFeatures { tiles, .. } => tiles,
            ObservationEncoder::LocalPixels { raster, .. }
            | ObservationEncoder::GlobalPixels { raster, .. } => raster.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh observation for `viewer`
    pub fn encode(&self, state: &GameState, viewer: PlayerId) -> Result<Vec<f32>> {
        let mut out = vec![0.0; self.len()];
        self.encode_into(state, viewer, &mut out)?;
        Ok(out)
    }

    /// Write the observation for `viewer` into `out`. Dead players observe
    /// all zeros.
    pub fn encode_into(&self, state: &GameState, viewer: PlayerId, out: &mut [f32]) -> Result<()> {
        if out.len() != self.len() {
            return Err(ValidationError::BufferLength {
                expected: self.len(),
                actual: out.len(),
            }
            .into());
        }

        let player = state.player(viewer)?;
        if player.is_dead() {
            out.fill(0.0);
            return Ok(());
        }
        let head = player.head();

        match *self {
            ObservationEncoder::LocalFeatures { radius } => {
                for (slot, hex) in out.iter_mut().zip(hex_area(head, radius)) {
                    *slot = FeatureCode::classify(state, viewer, hex).value();
                }
            }
            ObservationEncoder::GlobalFeatures { radius, .. } => {
                for (slot, tile) in out.iter_mut().zip(state.board().tiles()) {
                    let code = if tile.coord.distance_to(head) >= radius as i32 {
                        FeatureCode::Hidden
                    } else {
                        FeatureCode::classify(state, viewer, tile.coord)
                    };
                    *slot = code.value();
                }
            }
            ObservationEncoder::LocalPixels { raster, radius } => {
                raster.render_local(state, viewer, radius, out);
            }
            ObservationEncoder::GlobalPixels { raster, radius } => {
                raster.render_global(state, viewer, radius, out);
            }
        }

        Ok(())
    }
}
