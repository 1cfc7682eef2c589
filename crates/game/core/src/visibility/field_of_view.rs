use std::collections::BTreeSet;

use super::compute_visibility;
use crate::geometry::{Position, WorldPoint};
use crate::grid::Grid;

/// Visible-cell set of a single observer.
///
/// The set is rebuilt from scratch on every [`FieldOfView::recompute`]; the
/// result is a read-only query surface for perception and presentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldOfView {
    radius: u32,
    origin: Option<Position>,
    visible: BTreeSet<Position>,
}

impl FieldOfView {
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            origin: None,
            visible: BTreeSet::new(),
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius;
    }

    /// Cell the set was last computed from.
    pub fn origin(&self) -> Option<Position> {
        self.origin
    }

    /// Recomputes visibility from `origin`, treating unwalkable cells as opaque.
    pub fn recompute(&mut self, grid: &Grid, origin: Position) {
        self.visible.clear();
        self.origin = grid.contains(origin).then_some(origin);

        let visible = &mut self.visible;
        compute_visibility(
            grid,
            origin,
            self.radius,
            |position| grid.is_blocking(position),
            |position| {
                visible.insert(position);
            },
        );
    }

    /// Recomputes from the cell containing `point`.
    pub fn recompute_from(&mut self, grid: &Grid, point: WorldPoint) {
        self.recompute(grid, grid.world_to_cell(point));
    }

    pub fn is_visible(&self, position: Position) -> bool {
        self.visible.contains(&position)
    }

    /// Whether the cell containing `point` is currently visible.
    pub fn sees(&self, grid: &Grid, point: WorldPoint) -> bool {
        self.is_visible(grid.world_to_cell(point))
    }

    pub fn visible_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.visible.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn clear(&mut self) {
        self.visible.clear();
        self.origin = None;
    }
}
