use crate::error::GridError;
use crate::geometry::WorldPoint;

/// Grid shape and discretisation parameters.
///
/// The grid covers a `world_width × world_height` rectangle centred on
/// `center`, split into square cells of side `2 × cell_radius`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub cell_radius: f32,
    pub center: WorldPoint,
    /// Excludes a diagonal neighbour when either orthogonal cell shared with
    /// it is blocked, so paths never clip wall corners.
    pub prevent_corner_cutting: bool,
}

impl GridConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WORLD_SIZE: f32 = 30.0;
    pub const DEFAULT_CELL_RADIUS: f32 = 0.5;

    pub fn new(world_width: f32, world_height: f32, cell_radius: f32) -> Self {
        Self {
            world_width,
            world_height,
            cell_radius,
            center: WorldPoint::ZERO,
            prevent_corner_cutting: true,
        }
    }

    /// Configuration for a grid of exactly `width × height` cells.
    pub fn with_cells(width: u32, height: u32, cell_radius: f32) -> Self {
        let diameter = cell_radius * 2.0;
        Self::new(width as f32 * diameter, height as f32 * diameter, cell_radius)
    }

    pub fn with_center(mut self, center: WorldPoint) -> Self {
        self.center = center;
        self
    }

    pub fn with_corner_cutting(mut self, allowed: bool) -> Self {
        self.prevent_corner_cutting = !allowed;
        self
    }

    pub fn cell_diameter(&self) -> f32 {
        self.cell_radius * 2.0
    }

    /// Grid dimensions in cells, derived from world size and cell radius.
    pub fn dimensions(&self) -> (u32, u32) {
        let diameter = self.cell_diameter();
        let width = (self.world_width / diameter).round().max(0.0) as u32;
        let height = (self.world_height / diameter).round().max(0.0) as u32;
        (width, height)
    }

    /// Bottom-left corner of the covered rectangle.
    pub fn world_min(&self) -> WorldPoint {
        WorldPoint::new(
            self.center.x - self.world_width / 2.0,
            self.center.y - self.world_height / 2.0,
        )
    }

    pub fn validate(&self) -> Result<(u32, u32), GridError> {
        if !(self.cell_radius > 0.0) {
            return Err(GridError::InvalidCellRadius(self.cell_radius));
        }
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(GridError::InvalidWorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        Ok((width, height))
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_WORLD_SIZE,
            Self::DEFAULT_WORLD_SIZE,
            Self::DEFAULT_CELL_RADIUS,
        )
    }
}
