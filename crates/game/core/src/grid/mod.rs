//! Discretised walkability map.
//!
//! The [`Grid`] owns every [`Cell`] for its whole lifetime. Its shape is fixed
//! at construction; only the per-cell walkable flag changes afterwards, either
//! through [`Grid::set_walkable`] or a full [`Grid::recompute_walkability`]
//! against an [`ObstacleOracle`].
//!
//! Search annotations (costs, parents) and visibility flags are not stored
//! here: each pathfinding or visibility query keeps its own scratch state, so
//! nothing leaks from one query into the next.

mod generator;
mod layout;
mod oracle;

use arrayvec::ArrayVec;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::geometry::{Position, WorldPoint};

pub use generator::ObstacleScatter;
pub use layout::{BLOCKED_GLYPH, WALKABLE_GLYPH, parse_layout};
pub use oracle::{BoxObstacles, ObstacleOracle, OpenField, WalkabilityMask};

/// Up to eight adjacent cells.
pub type Neighbors = ArrayVec<Position, 8>;

/// A single grid node.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    position: Position,
    world: WorldPoint,
    walkable: bool,
}

impl Cell {
    pub fn position(&self) -> Position {
        self.position
    }

    /// World-space centre of the cell.
    pub fn world_position(&self) -> WorldPoint {
        self.world
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }
}

/// Fixed-size 2D array of cells, stored row-major (`index = y * width + x`).
#[derive(Clone, Debug)]
pub struct Grid {
    config: GridConfig,
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds the grid, querying `oracle` at every cell centre.
    pub fn build<O>(config: GridConfig, oracle: &O) -> Result<Self, GridError>
    where
        O: ObstacleOracle + ?Sized,
    {
        let radius = config.cell_radius;
        Self::with_walkability(config, |_, world| !oracle.is_blocked(world, radius))
    }

    /// Builds a grid with every cell walkable.
    pub fn open(config: GridConfig) -> Result<Self, GridError> {
        Self::with_walkability(config, |_, _| true)
    }

    /// Builds a grid whose walkability is decided per cell by `walkable`.
    pub fn from_fn(
        config: GridConfig,
        mut walkable: impl FnMut(Position) -> bool,
    ) -> Result<Self, GridError> {
        Self::with_walkability(config, |position, _| walkable(position))
    }

    fn with_walkability(
        config: GridConfig,
        mut walkable: impl FnMut(Position, WorldPoint) -> bool,
    ) -> Result<Self, GridError> {
        let (width, height) = config.validate()?;
        let min = config.world_min();
        let diameter = config.cell_diameter();

        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let position = Position::new(x, y);
                let world = WorldPoint::new(
                    min.x + x as f32 * diameter + config.cell_radius,
                    min.y + y as f32 * diameter + config.cell_radius,
                );
                cells.push(Cell {
                    position,
                    world,
                    walkable: walkable(position, world),
                });
            }
        }

        Ok(Self {
            config,
            width,
            height,
            cells,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// Dense index of `position`, or `None` when it lies outside the grid.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    /// Inverse of [`Grid::index_of`]. `index` must be below [`Grid::len`].
    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index_of(position).map(|index| &self.cells[index])
    }

    /// Bounds-checked lookup; returns `None` for off-grid coordinates.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cell(Position::new(x, y))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// `false` for off-grid positions.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.cell(position).is_some_and(Cell::is_walkable)
    }

    /// `true` only for on-grid cells that block movement and sight.
    pub fn is_blocking(&self, position: Position) -> bool {
        self.cell(position).is_some_and(|cell| !cell.walkable)
    }

    /// Maps a world point to the cell containing it, clamped to the grid.
    ///
    /// Points far outside the covered rectangle resolve to the nearest border cell.
    pub fn world_to_cell(&self, point: WorldPoint) -> Position {
        let min = self.config.world_min();
        let percent_x = ((point.x - min.x) / self.config.world_width).clamp(0.0, 1.0);
        let percent_y = ((point.y - min.y) / self.config.world_height).clamp(0.0, 1.0);
        let percent_x = if percent_x.is_nan() { 0.0 } else { percent_x };
        let percent_y = if percent_y.is_nan() { 0.0 } else { percent_y };

        let x = ((percent_x * self.width as f32) as u32).min(self.width - 1);
        let y = ((percent_y * self.height as f32) as u32).min(self.height - 1);
        Position::new(x as i32, y as i32)
    }

    /// World-space centre of `position`. Off-grid positions are clamped first.
    pub fn cell_to_world(&self, position: Position) -> WorldPoint {
        let x = position.x.clamp(0, self.width as i32 - 1);
        let y = position.y.clamp(0, self.height as i32 - 1);
        self.cells[y as usize * self.width as usize + x as usize].world
    }

    /// Adjacent cells (3×3 minus self), bounds-filtered.
    ///
    /// With corner-cutting prevention enabled, a diagonal neighbour is skipped
    /// when either orthogonal cell between it and `position` is blocked.
    pub fn neighbors(&self, position: Position) -> Neighbors {
        let mut neighbors = Neighbors::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let candidate = Position::new(position.x + dx, position.y + dy);
                if !self.contains(candidate) {
                    continue;
                }
                if dx != 0 && dy != 0 && self.config.prevent_corner_cutting {
                    let horizontal = Position::new(candidate.x, position.y);
                    let vertical = Position::new(position.x, candidate.y);
                    if !self.is_walkable(horizontal) || !self.is_walkable(vertical) {
                        continue;
                    }
                }
                neighbors.push(candidate);
            }
        }
        neighbors
    }

    /// Walkable neighbour with the lowest movement cost from `position`.
    ///
    /// Ties go to the first neighbour in scan order.
    pub fn closest_walkable_neighbor(&self, position: Position) -> Option<Position> {
        self.neighbors(position)
            .into_iter()
            .filter(|candidate| self.is_walkable(*candidate))
            .min_by_key(|candidate| position.octile_distance(*candidate))
    }

    /// Cell containing `point` if walkable, otherwise its closest walkable neighbour.
    pub fn nearest_walkable(&self, point: WorldPoint) -> Option<Position> {
        let cell = self.world_to_cell(point);
        if self.is_walkable(cell) {
            Some(cell)
        } else {
            self.closest_walkable_neighbor(cell)
        }
    }

    /// Sets the walkable flag of one cell. Returns `false` for off-grid positions.
    pub fn set_walkable(&mut self, position: Position, walkable: bool) -> bool {
        match self.index_of(position) {
            Some(index) => {
                self.cells[index].walkable = walkable;
                true
            }
            None => false,
        }
    }

    /// Re-evaluates every cell against `oracle` and returns how many flipped.
    ///
    /// This is O(width × height) oracle queries; intended for occasional
    /// full refreshes such as after an obstacle is destroyed.
    pub fn recompute_walkability<O>(&mut self, oracle: &O) -> usize
    where
        O: ObstacleOracle + ?Sized,
    {
        let radius = self.config.cell_radius;
        let mut changed = 0;
        for cell in &mut self.cells {
            let walkable = !oracle.is_blocked(cell.world, radius);
            if walkable != cell.walkable {
                cell.walkable = walkable;
                changed += 1;
            }
        }
        changed
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.walkable).count()
    }
}
