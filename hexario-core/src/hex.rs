//! Hex grid geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// sqrt(3), used by the pointy-top layout
pub const SQRT3: f32 = 1.732_050_8;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Origin of the board
pub const CENTER: Hex = Hex::new(0, 0);

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),   // E
    (1, -1),  // NE
    (0, -1),  // NW
    (-1, 0),  // W
    (-1, 1),  // SW
    (0, 1),   // SE
];

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Third cube coordinate
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i32 {
        (self.q.abs() + self.r.abs() + (self.q + self.r).abs()) / 2
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: Direction) -> Hex {
        let (dq, dr) = direction.vector();
        Hex::new(self.q + dq, self.r + dr)
    }

    /// Step `n` tiles along a direction
    pub fn offset(&self, direction: Direction, n: i32) -> Hex {
        let (dq, dr) = direction.vector();
        Hex::new(self.q + n * dq, self.r + n * dr)
    }

    /// Whether `other` shares an edge with this hex
    pub fn is_neighbor(&self, other: Hex) -> bool {
        self.distance_to(other) == 1
    }

    /// Center of this hex in unit cartesian space (pointy-top layout)
    pub fn to_point(&self) -> Point {
        Point {
            x: SQRT3 * (self.q as f32 + self.r as f32 / 2.0),
            y: 1.5 * self.r as f32,
        }
    }
}

/// One of the six hex axes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction(u8);

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction(0),
        Direction(1),
        Direction(2),
        Direction(3),
        Direction(4),
        Direction(5),
    ];

    /// Direction from an index, `None` outside 0-5
    pub fn from_index(index: usize) -> Option<Self> {
        (index < 6).then_some(Direction(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn vector(self) -> (i32, i32) {
        DIRECTIONS[self.index()]
    }

    pub fn opposite(self) -> Self {
        Direction((self.0 + 3) % 6)
    }

    /// Offset between neighboring tile centers along this axis
    pub fn step_vector(self) -> Point {
        let (dq, dr) = self.vector();
        Hex::new(dq, dr).to_point()
    }

    /// Axis closest to a continuous heading. Angle `a` points along
    /// `(-sin a, cos a)` in the cartesian frame, so 0 is straight down
    /// the screen and pi/2 is due west. Ties go to the lower index.
    pub fn nearest(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut best = Direction(0);
        let mut best_dot = f32::NEG_INFINITY;

        for dir in Self::ALL {
            let u = dir.step_vector();
            let dot = -u.x * sin + u.y * cos;
            if dot > best_dot + 1e-6 {
                best = dir;
                best_dot = dot;
            }
        }

        best
    }
}

/// Fractional position in cartesian space, one unit = one hex edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Translate by `scale` times `other`
    pub fn add_scaled(&self, other: Point, scale: f32) -> Point {
        Point::new(self.x + other.x * scale, self.y + other.y * scale)
    }

    /// Hex containing this point (cube rounding)
    pub fn to_hex(&self) -> Hex {
        let q = SQRT3 / 3.0 * self.x - self.y / 3.0;
        let r = 2.0 / 3.0 * self.y;
        cube_round(q, r)
    }
}

fn cube_round(q: f32, r: f32) -> Hex {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    Hex::new(rq as i32, rr as i32)
}

/// Number of tiles covered by `rings` rings including the center
pub fn area_size(rings: u32) -> usize {
    let r = rings as usize;
    if r == 0 {
        return 0;
    }
    1 + 3 * r * (r - 1)
}

/// Ring at distance `distance` from center, starting at `center + (-d, d)`
/// and walking the six directions in order
pub fn iter_hex_ring(center: Hex, distance: i32) -> impl Iterator<Item = Hex> {
    let start = Hex::new(center.q - distance, center.r + distance);
    let len = if distance > 0 { 6 * distance } else { 0 };

    let mut current = start;
    (0..len).map(move |i| {
        let tile = current;
        let side = Direction((i / distance.max(1)) as u8);
        current = current.neighbor(side);
        tile
    })
}

/// All tiles with distance `< rings` from center: the center first, then
/// each ring outward in [`iter_hex_ring`] order
pub fn hex_area(center: Hex, rings: u32) -> Vec<Hex> {
    let mut area = Vec::with_capacity(area_size(rings));
    if rings == 0 {
        return area;
    }

    area.push(center);
    for distance in 1..rings as i32 {
        area.extend(iter_hex_ring(center, distance));
    }

    area
}

/// Position of `hex` within `hex_area(CENTER, _)`, for any area large
/// enough to hold it
pub fn area_index(hex: Hex) -> Option<usize> {
    let d = hex.distance_to_center();
    if d == 0 {
        return Some(0);
    }

    let base = area_size(d as u32);
    let mut corner = Hex::new(-d, d);
    for side in Direction::ALL {
        let (dq, dr) = side.vector();
        let j = if dq != 0 {
            (hex.q - corner.q) / dq
        } else {
            (hex.r - corner.r) / dr
        };
        if (0..d).contains(&j) && corner.offset(side, j) == hex {
            return Some(base + side.index() * d as usize + j as usize);
        }
        corner = corner.offset(side, d);
    }

    None
}
