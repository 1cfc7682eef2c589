use crate::geometry::{Position, WorldPoint};
use crate::grid::Grid;

/// Result of a successful search.
///
/// `cells` runs from the first step after the start up to and including the
/// target; the start cell itself is never part of it. `cost` is the summed
/// octile step cost of that walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Position>,
    cost: u32,
}

impl Path {
    pub fn new(cells: Vec<Position>, cost: u32) -> Self {
        Self { cells, cost }
    }

    /// A path that is already at its destination.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Position> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Final cell, or `None` when the search started on the target.
    pub fn target(&self) -> Option<Position> {
        self.cells.last().copied()
    }

    /// World-space waypoints, one per cell centre.
    pub fn waypoints<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = WorldPoint> + 'a {
        self.cells.iter().map(|position| grid.cell_to_world(*position))
    }
}
