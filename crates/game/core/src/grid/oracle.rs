use super::Grid;
use crate::geometry::WorldPoint;

/// Collision query supplied by the surrounding physics layer.
///
/// The grid asks it once per cell centre when it is built and again on every
/// explicit walkability refresh. Pathfinding and visibility only ever read
/// the discretised walkable flag, never this oracle.
pub trait ObstacleOracle {
    /// Returns `true` if a disc of `radius` centred at `point` overlaps an obstacle.
    fn is_blocked(&self, point: WorldPoint, radius: f32) -> bool;
}

impl<F> ObstacleOracle for F
where
    F: Fn(WorldPoint, f32) -> bool,
{
    fn is_blocked(&self, point: WorldPoint, radius: f32) -> bool {
        self(point, radius)
    }
}

/// Oracle for an empty world with no obstacles.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl ObstacleOracle for OpenField {
    fn is_blocked(&self, _point: WorldPoint, _radius: f32) -> bool {
        false
    }
}

/// Axis-aligned rectangular obstacles, useful for scripted scenes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxObstacles {
    boxes: Vec<(WorldPoint, WorldPoint)>,
}

impl BoxObstacles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box spanning the two corners (in any order).
    pub fn with_box(mut self, a: WorldPoint, b: WorldPoint) -> Self {
        self.push(a, b);
        self
    }

    pub fn push(&mut self, a: WorldPoint, b: WorldPoint) {
        let min = WorldPoint::new(a.x.min(b.x), a.y.min(b.y));
        let max = WorldPoint::new(a.x.max(b.x), a.y.max(b.y));
        self.boxes.push((min, max));
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl ObstacleOracle for BoxObstacles {
    fn is_blocked(&self, point: WorldPoint, radius: f32) -> bool {
        self.boxes.iter().any(|(min, max)| {
            // Distance from the disc centre to the closest point of the box.
            let cx = point.x.clamp(min.x, max.x);
            let cy = point.y.clamp(min.y, max.y);
            point.distance_squared(WorldPoint::new(cx, cy)) < radius * radius
        })
    }
}

/// Static walls taken from a grid's walkable flags.
///
/// Lets a layout-authored map act as the collision layer, so later refreshes
/// can combine it with dynamic obstacles. Points outside the grid resolve to
/// the nearest border cell.
#[derive(Clone, Debug)]
pub struct WalkabilityMask {
    grid: Grid,
}

impl WalkabilityMask {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl ObstacleOracle for WalkabilityMask {
    fn is_blocked(&self, point: WorldPoint, _radius: f32) -> bool {
        self.grid.is_blocking(self.grid.world_to_cell(point))
    }
}
