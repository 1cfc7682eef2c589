//! Seeded scattering of single-cell obstacles.
//!
//! Every cell is visited once in a shuffled order. A cell becomes an obstacle
//! unless it is reserved, already blocked, or closer than `min_spacing` cells
//! (Euclidean, between cell coordinates) to an obstacle placed by this run.
//! Placement stops after `count` obstacles, so sparse grids may end up with
//! fewer.

use super::{Grid, WalkabilityMask};
use crate::error::GridError;
use crate::geometry::Position;
use crate::rng::Pcg32;

/// Parameters of one obstacle scatter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleScatter {
    pub count: usize,
    pub min_spacing: f32,
    pub seed: u64,
}

impl ObstacleScatter {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COUNT: usize = 20;
    pub const DEFAULT_MIN_SPACING: f32 = 2.0;

    pub fn new(count: usize, min_spacing: f32, seed: u64) -> Self {
        Self {
            count,
            min_spacing,
            seed,
        }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if !self.min_spacing.is_finite() || self.min_spacing < 0.0 {
            return Err(GridError::InvalidSpacing(self.min_spacing));
        }
        Ok(())
    }

    /// Picks obstacle cells on `grid`, in placement order.
    pub fn place(&self, grid: &Grid, reserved: &[Position]) -> Result<Vec<Position>, GridError> {
        self.validate()?;

        let mut candidates: Vec<usize> = (0..grid.len()).collect();
        Pcg32::new(self.seed, 0).shuffle(&mut candidates);

        let min_squared = self.min_spacing * self.min_spacing;
        let mut placed: Vec<Position> = Vec::with_capacity(self.count);
        for index in candidates {
            if placed.len() >= self.count {
                break;
            }
            let cell = grid.position_of(index);
            if reserved.contains(&cell) || !grid.is_walkable(cell) {
                continue;
            }
            let crowded = placed
                .iter()
                .any(|other| (other.distance_squared(cell) as f32) < min_squared);
            if !crowded {
                placed.push(cell);
            }
        }
        Ok(placed)
    }

    /// Wall layer of `grid` with the scattered obstacles added.
    ///
    /// Feed it to [`Grid::recompute_walkability`] (or [`Grid::build`]) to
    /// apply the obstacles.
    pub fn wall_layer(&self, grid: &Grid, reserved: &[Position]) -> Result<WalkabilityMask, GridError> {
        let placed = self.place(grid, reserved)?;
        Ok(walls_with(grid, &placed))
    }
}

fn walls_with(grid: &Grid, obstacles: &[Position]) -> WalkabilityMask {
    let mut walls = grid.clone();
    for &cell in obstacles {
        walls.set_walkable(cell, false);
    }
    WalkabilityMask::new(walls)
}

impl Default for ObstacleScatter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COUNT, Self::DEFAULT_MIN_SPACING, 0)
    }
}

impl Grid {
    /// Scatters obstacles over this grid and rebuilds walkability.
    ///
    /// Returns the cells that became blocked.
    pub fn scatter_obstacles(
        &mut self,
        scatter: &ObstacleScatter,
        reserved: &[Position],
    ) -> Result<Vec<Position>, GridError> {
        let placed = scatter.place(self, reserved)?;
        let walls = walls_with(self, &placed);
        self.recompute_walkability(&walls);
        Ok(placed)
    }
}
