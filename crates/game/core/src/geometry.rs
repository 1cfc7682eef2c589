//! Coordinate types shared by the grid, visibility and pathfinding modules.
//!
//! Two spaces coexist:
//! - [`Position`]: discrete cell coordinates on the walkability grid.
//! - [`WorldPoint`]: continuous world-space coordinates on the ground plane.
use std::fmt;

/// Cost of one orthogonal step in integer movement units.
pub const ORTHOGONAL_COST: u32 = 10;

/// Cost of one diagonal step in integer movement units (≈ √2 × 10).
pub const DIAGONAL_COST: u32 = 14;

/// Discrete grid position expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Octile distance to `other`: 14 per diagonal step, 10 per orthogonal step.
    pub fn octile_distance(self, other: Position) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        DIAGONAL_COST * dx.min(dy) + ORTHOGONAL_COST * dx.abs_diff(dy)
    }

    /// Squared Euclidean distance in cells.
    pub fn distance_squared(self, other: Position) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Chebyshev (king-move) distance in cells.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Continuous world-space point on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Moves from `self` towards `target` by at most `max_step`, never overshooting.
    pub fn move_towards(self, target: WorldPoint, max_step: f32) -> WorldPoint {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= max_step || distance == 0.0 {
            return target;
        }
        let scale = max_step / distance;
        WorldPoint::new(self.x + dx * scale, self.y + dy * scale)
    }

    pub fn offset(self, dx: f32, dy: f32) -> WorldPoint {
        WorldPoint::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
