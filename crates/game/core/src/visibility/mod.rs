//! Symmetric recursive shadow casting.
//!
//! [`compute_visibility`] sweeps eight octants around an origin. Each octant
//! is scanned row by row (distance band along its primary axis), and inside a
//! row column by column from the axis outwards. Visible blocking cells cast
//! [`Shadow`] intervals of slope that hide everything behind them further
//! out; consecutive blocking cells in one row widen the same shadow instead
//! of adding a fresh interval, which is what keeps a straight wall run
//! opaque in the next row.
//!
//! The scan is a pure function of the origin, radius and blocking predicate.
//! It never mutates the grid and keeps nothing between calls, so it is safe
//! to run every simulation tick.

mod field_of_view;

use strum::{EnumIter, IntoEnumIterator};

use crate::geometry::Position;
use crate::grid::Grid;

pub use field_of_view::FieldOfView;

/// One of the eight 45° sectors around an observer.
///
/// Names follow the compass with `+y` as north; each octant maps sweep
/// coordinates `(row, col)` to grid offsets with a fixed reflection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Octant {
    NorthNorthEast,
    EastNorthEast,
    WestNorthWest,
    NorthNorthWest,
    SouthSouthWest,
    WestSouthWest,
    EastSouthEast,
    SouthSouthEast,
}

impl Octant {
    /// Absolute grid position of sweep cell `(row, col)` relative to `origin`.
    pub const fn transform(self, origin: Position, row: i32, col: i32) -> Position {
        let (dx, dy) = match self {
            Octant::NorthNorthEast => (col, row),
            Octant::EastNorthEast => (row, col),
            Octant::WestNorthWest => (-row, col),
            Octant::NorthNorthWest => (-col, row),
            Octant::SouthSouthWest => (-col, -row),
            Octant::WestSouthWest => (-row, -col),
            Octant::EastSouthEast => (row, -col),
            Octant::SouthSouthEast => (col, -row),
        };
        Position::new(origin.x + dx, origin.y + dy)
    }
}

/// Slope interval occluded by an obstacle, scoped to one octant scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub start: f32,
    pub end: f32,
}

impl Shadow {
    /// Shadow cast by the cell at `(row, col)`: from its near corner to its far corner.
    pub fn of_cell(row: i32, col: i32) -> Self {
        Self {
            start: (col as f32 - 0.5) / (row as f32 + 0.5),
            end: (col as f32 + 0.5) / (row as f32 - 0.5),
        }
    }

    pub fn contains(&self, slope: f32) -> bool {
        self.start <= slope && slope <= self.end
    }
}

/// Reports every cell visible from `origin` within `radius`.
///
/// `is_blocking` is only consulted for on-grid cells that are themselves
/// visible; `on_visible` receives each visible on-grid cell (cells on octant
/// boundaries may be reported twice). The origin is always reported first.
/// An off-grid origin reports nothing.
///
/// Rows are scanned up to and including `radius`, so on an open grid the
/// reported cells are exactly those at Euclidean distance `<= radius`, the
/// four axis cells at distance `radius` included.
pub fn compute_visibility(
    grid: &Grid,
    origin: Position,
    radius: u32,
    mut is_blocking: impl FnMut(Position) -> bool,
    mut on_visible: impl FnMut(Position),
) {
    if !grid.contains(origin) {
        return;
    }
    on_visible(origin);

    let mut shadows = Vec::new();
    for octant in Octant::iter() {
        shadows.clear();
        scan_octant(
            grid,
            origin,
            radius,
            octant,
            &mut shadows,
            &mut is_blocking,
            &mut on_visible,
        );
    }
}

fn scan_octant(
    grid: &Grid,
    origin: Position,
    radius: u32,
    octant: Octant,
    shadows: &mut Vec<Shadow>,
    is_blocking: &mut impl FnMut(Position) -> bool,
    on_visible: &mut impl FnMut(Position),
) {
    let radius_squared = radius as i64 * radius as i64;

    for row in 1..=radius as i32 {
        // Set while the previous cell in this row was a visible obstacle.
        let mut extending = false;

        for col in 0..=row {
            let position = octant.transform(origin, row, col);
            if !grid.contains(position) {
                extending = false;
                continue;
            }

            let slope = col as f32 / row as f32;
            if shadows.iter().any(|shadow| shadow.contains(slope)) {
                extending = false;
                continue;
            }

            if position.distance_squared(origin) > radius_squared {
                extending = false;
                continue;
            }

            on_visible(position);

            if !is_blocking(position) {
                extending = false;
                continue;
            }

            let shadow = Shadow::of_cell(row, col);
            match shadows.last_mut() {
                Some(last) if extending => last.end = shadow.end,
                _ => shadows.push(shadow),
            }
            extending = true;
        }
    }
}
