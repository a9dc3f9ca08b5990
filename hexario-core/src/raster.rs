//! Software rasterizer for pixel observations
//!
//! Every pixel is mapped back to a world point, rounded to the hex it falls
//! in, and colored from that tile's state. Heads are drawn as dark discs at
//! the players' continuous positions. Output is row-major RGB, one f32 per
//! channel in [0, 255].

use crate::game::GameState;
use crate::hex::{Point, CENTER};
use crate::player::PlayerId;

pub type Rgb = [u8; 3];

pub const OWN_COLOR: Rgb = [0, 255, 0];
pub const ENEMY_COLOR: Rgb = [0, 102, 255];
pub const BORDER_COLOR: Rgb = [255, 0, 0];
pub const NEUTRAL_COLOR: Rgb = [255, 255, 255];
pub const BACKGROUND_COLOR: Rgb = [230, 230, 230];

/// Radius of a head disc, in hex sizes
const HEAD_RADIUS: f32 = 0.5;
const CLAIM_LIGHTEN: f32 = 0.5;
const HEAD_DARKEN: f32 = 0.4;

/// World units per ring of visibility
const RING_HEIGHT: f32 = 1.5;

pub fn lighten(color: Rgb, amount: f32) -> Rgb {
    color.map(|c| (c as f32 + 255.0 * amount).min(255.0) as u8)
}

pub fn darken(color: Rgb, amount: f32) -> Rgb {
    color.map(|c| (c as f32 - 255.0 * amount).max(0.0) as u8)
}

/// Window of the world mapped onto the image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Point,
    /// World units spanned by the image height
    pub span: f32,
}

impl Viewport {
    /// Window centered on `center` showing `rings` rings in each direction
    pub fn around(center: Point, rings: u32) -> Self {
        Self {
            center,
            span: (1.0 + 2.0 * rings as f32) * RING_HEIGHT,
        }
    }
}

/// Fixed-size RGB raster
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rasterizer {
    pub width: u32,
    pub height: u32,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View centered on the player
    pub fn render_local(&self, state: &GameState, viewer: PlayerId, radius: u32, out: &mut [f32]) {
        let focus = state.players()[viewer].position();
        self.render(state, viewer, Viewport::around(focus, radius), None, out);
    }

    /// Whole board, greyed out beyond the player's visibility
    pub fn render_global(&self, state: &GameState, viewer: PlayerId, radius: u32, out: &mut [f32]) {
        let focus = state.players()[viewer].position();
        let view = Viewport::around(CENTER.to_point(), state.board().radius());
        let visible = radius as f32 * RING_HEIGHT;
        self.render(state, viewer, view, Some((focus, visible)), out);
    }

    fn render(
        &self,
        state: &GameState,
        viewer: PlayerId,
        view: Viewport,
        visible: Option<(Point, f32)>,
        out: &mut [f32],
    ) {
        let scale = view.span / self.height as f32;
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;

        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(
                    view.center.x + (x as f32 + 0.5 - half_w) * scale,
                    view.center.y + (y as f32 + 0.5 - half_h) * scale,
                );

                let color = match visible {
                    Some((focus, range)) if point.distance_to(focus) > range => BACKGROUND_COLOR,
                    _ => color_at(state, viewer, point),
                };

                let i = (y as usize * self.width as usize + x as usize) * 3;
                for (c, &v) in color.iter().enumerate() {
                    out[i + c] = v as f32;
                }
            }
        }
    }
}

fn color_at(state: &GameState, viewer: PlayerId, point: Point) -> Rgb {
    let tint = |id: PlayerId| if id == viewer { OWN_COLOR } else { ENEMY_COLOR };

    for player in state.players().iter().filter(|p| p.is_alive()) {
        if point.distance_to(player.position()) < HEAD_RADIUS {
            return darken(tint(player.id()), HEAD_DARKEN);
        }
    }

    let hex = point.to_hex();
    let board = state.board();
    let Some(tile) = board.tile(hex) else {
        return if hex.distance_to_center() == board.radius() as i32 {
            BORDER_COLOR
        } else {
            BACKGROUND_COLOR
        };
    };

    match (tile.claimed_by(), tile.owner()) {
        (Some(claimant), _) => lighten(tint(claimant), CLAIM_LIGHTEN),
        (None, Some(owner)) => tint(owner),
        (None, None) => NEUTRAL_COLOR,
    }
}
