//! A* search over the walkability grid.
//!
//! Step costs are octile (10 orthogonal, 14 diagonal) and the heuristic is
//! the same octile distance, which is admissible and consistent on an
//! 8-connected grid, so the first time the target is popped its cost is
//! optimal.
//!
//! The open set is an [`IndexedHeap`] keyed by `(f, h, insertion order)`:
//! lower `f` first, then the node nearer the target, then whichever entered
//! the open set earlier. That makes every query deterministic for a given
//! grid.

mod heap;
mod path;

use crate::geometry::{Position, WorldPoint};
use crate::grid::Grid;

pub use heap::IndexedHeap;
pub use path::Path;

/// Finds a path between two world points with a one-off [`Pathfinder`].
///
/// Endpoints on unwalkable cells are snapped to their closest walkable
/// neighbour. Returns an empty path when both endpoints resolve to the same
/// cell and `None` when the target cannot be reached.
pub fn find_path(grid: &Grid, start: WorldPoint, target: WorldPoint) -> Option<Path> {
    Pathfinder::new().find_path(grid, start, target)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SearchKey {
    f: u32,
    h: u32,
    sequence: u32,
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    g: u32,
    parent: Option<usize>,
    closed: bool,
}

impl SearchNode {
    const UNVISITED: Self = Self {
        g: u32::MAX,
        parent: None,
        closed: false,
    };
}

/// Reusable A* search state.
///
/// All per-node annotations live here and are reset at the start of every
/// query, so one instance can serve any number of searches on grids of any
/// size.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    nodes: Vec<SearchNode>,
    open: IndexedHeap<SearchKey>,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches between the cells containing `start` and `target`.
    pub fn find_path(&mut self, grid: &Grid, start: WorldPoint, target: WorldPoint) -> Option<Path> {
        let start = grid.world_to_cell(start);
        let target = grid.world_to_cell(target);
        self.find_path_between(grid, start, target)
    }

    /// Searches between two cells. Off-grid endpoints yield `None`.
    pub fn find_path_between(
        &mut self,
        grid: &Grid,
        start: Position,
        target: Position,
    ) -> Option<Path> {
        let start = snap_to_walkable(grid, start)?;
        let target = snap_to_walkable(grid, target)?;
        if start == target {
            return Some(Path::empty());
        }

        let start_index = grid.index_of(start)?;
        let target_index = grid.index_of(target)?;
        self.reset(grid.len());

        let mut sequence = 0u32;
        self.nodes[start_index].g = 0;
        let h = start.octile_distance(target);
        self.open.push(start_index, SearchKey { f: h, h, sequence });

        while let Some((current_index, _)) = self.open.pop() {
            self.nodes[current_index].closed = true;
            if current_index == target_index {
                return Some(self.retrace(grid, start_index, target_index));
            }

            let current = grid.position_of(current_index);
            let current_g = self.nodes[current_index].g;

            for neighbor in grid.neighbors(current) {
                if !grid.is_walkable(neighbor) {
                    continue;
                }
                let Some(index) = grid.index_of(neighbor) else {
                    continue;
                };
                if self.nodes[index].closed {
                    continue;
                }

                let cost = current_g + current.octile_distance(neighbor);
                let queued = self.open.priority(index);
                if queued.is_some() && cost >= self.nodes[index].g {
                    continue;
                }

                let node = &mut self.nodes[index];
                node.g = cost;
                node.parent = Some(current_index);

                let h = neighbor.octile_distance(target);
                match queued {
                    Some(key) => {
                        self.open.update(
                            index,
                            SearchKey {
                                f: cost + h,
                                h,
                                sequence: key.sequence,
                            },
                        );
                    }
                    None => {
                        sequence += 1;
                        self.open.push(
                            index,
                            SearchKey {
                                f: cost + h,
                                h,
                                sequence,
                            },
                        );
                    }
                }
            }
        }

        None
    }

    fn reset(&mut self, len: usize) {
        self.open.clear();
        self.nodes.clear();
        self.nodes.resize(len, SearchNode::UNVISITED);
    }

    fn retrace(&self, grid: &Grid, start_index: usize, target_index: usize) -> Path {
        let mut cells = Vec::new();
        let mut current = target_index;
        while current != start_index {
            cells.push(grid.position_of(current));
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        cells.reverse();
        Path::new(cells, self.nodes[target_index].g)
    }
}

fn snap_to_walkable(grid: &Grid, position: Position) -> Option<Position> {
    if !grid.contains(position) {
        return None;
    }
    if grid.is_walkable(position) {
        Some(position)
    } else {
        grid.closest_walkable_neighbor(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn open_grid(width: u32, height: u32) -> Grid {
        Grid::open(GridConfig::with_cells(width, height, 0.5)).unwrap()
    }

    #[test]
    fn diagonal_across_open_grid() {
        let grid = open_grid(10, 10);
        let path = Pathfinder::new()
            .find_path_between(&grid, Position::new(0, 0), Position::new(9, 9))
            .unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.cost(), 126);
        assert_eq!(path.target(), Some(Position::new(9, 9)));
        assert!(!path.cells().contains(&Position::new(0, 0)));
    }

    #[test]
    fn open_grid_costs_match_octile_distance() {
        let grid = open_grid(12, 12);
        let mut pathfinder = Pathfinder::new();
        let pairs = [
            ((0, 0), (11, 0)),
            ((2, 3), (9, 5)),
            ((11, 11), (0, 4)),
            ((6, 1), (6, 10)),
            ((3, 9), (8, 2)),
        ];
        for ((sx, sy), (tx, ty)) in pairs {
            let start = Position::new(sx, sy);
            let target = Position::new(tx, ty);
            let path = pathfinder.find_path_between(&grid, start, target).unwrap();
            assert_eq!(path.cost(), start.octile_distance(target), "{start} -> {target}");
            assert_eq!(path.len() as u32, start.chebyshev_distance(target));
        }
    }

    #[test]
    fn routes_around_walls_without_cutting_corners() {
        let grid = Grid::from_layout(
            ".....\n\
             .###.\n\
             .....",
            0.5,
        )
        .unwrap();
        let path = find_path(
            &grid,
            grid.cell_to_world(Position::new(0, 1)),
            grid.cell_to_world(Position::new(4, 1)),
        )
        .unwrap();
        assert_eq!(path.cost(), 60);
        assert_eq!(path.len(), 6);
        assert!(path.cells().iter().all(|cell| grid.is_walkable(*cell)));
    }

    #[test]
    fn sealed_target_is_unreachable() {
        let grid = Grid::from_layout(
            "..#..\n\
             ..#..\n\
             ..#..",
            0.5,
        )
        .unwrap();
        let path = Pathfinder::new().find_path_between(&grid, Position::new(0, 1), Position::new(4, 1));
        assert_eq!(path, None);
    }

    #[test]
    fn unwalkable_endpoints_snap_to_neighbours() {
        let grid = Grid::from_layout(
            "#...#\n\
             .....",
            0.5,
        )
        .unwrap();
        let path = Pathfinder::new()
            .find_path_between(&grid, Position::new(0, 0), Position::new(4, 0))
            .unwrap();
        // (0, 0) snaps to (0, 1) and (4, 0) to (4, 1).
        assert_eq!(path.cost(), 40);
        assert_eq!(path.target(), Some(Position::new(4, 1)));
        assert!(path.cells().iter().all(|cell| grid.is_walkable(*cell)));
    }

    #[test]
    fn same_cell_yields_empty_path() {
        let grid = open_grid(4, 4);
        let point = grid.cell_to_world(Position::new(2, 2));
        let path = find_path(&grid, point, point.offset(0.1, -0.1)).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn off_grid_cells_are_rejected() {
        let grid = open_grid(4, 4);
        let mut pathfinder = Pathfinder::new();
        assert_eq!(
            pathfinder.find_path_between(&grid, Position::new(-1, 0), Position::new(2, 2)),
            None
        );
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let grid = Grid::from_layout(
            "........\n\
             ..##....\n\
             ....#...\n\
             .#......\n\
             ...###..\n\
             ........",
            0.5,
        )
        .unwrap();
        let mut pathfinder = Pathfinder::new();
        let first = pathfinder.find_path_between(&grid, Position::new(0, 0), Position::new(7, 5));
        // An unrelated query in between must not leak state.
        pathfinder.find_path_between(&grid, Position::new(7, 0), Position::new(0, 5));
        let second = pathfinder.find_path_between(&grid, Position::new(0, 0), Position::new(7, 5));
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(
            first,
            Pathfinder::new().find_path_between(&grid, Position::new(0, 0), Position::new(7, 5))
        );
    }

    #[test]
    fn waypoints_follow_cell_centres() {
        let grid = open_grid(3, 1);
        let path = Pathfinder::new()
            .find_path_between(&grid, Position::new(0, 0), Position::new(2, 0))
            .unwrap();
        let waypoints: Vec<WorldPoint> = path.waypoints(&grid).collect();
        assert_eq!(
            waypoints,
            vec![
                grid.cell_to_world(Position::new(1, 0)),
                grid.cell_to_world(Position::new(2, 0)),
            ]
        );
    }
}
