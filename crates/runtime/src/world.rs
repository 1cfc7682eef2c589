//! Shared world the agents act in: the grid, its obstacles and the stations.
//!
//! Walkability is the static wall layer plus every alive station. It is
//! refreshed explicitly whenever that composition changes, never while an
//! agent is in the middle of its tick.

use game_core::{Grid, ObstacleOracle, Path, Pathfinder, WorldPoint};
use tracing::info;

use crate::error::{Result, RuntimeError};
use crate::events::StationId;

/// Energy station that agents recharge at.
///
/// An alive station blocks an axis-aligned square footprint. Destroyed
/// stations stay listed so stale references can be detected.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    id: StationId,
    position: WorldPoint,
    half_extent: f32,
    alive: bool,
}

impl Station {
    pub fn new(id: StationId, position: WorldPoint, half_extent: f32) -> Self {
        Self {
            id,
            position,
            half_extent,
            alive: true,
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn position(&self) -> WorldPoint {
        self.position
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn destroy(&mut self) {
        self.alive = false;
    }

    /// Whether a disc at `point` overlaps the footprint of this alive station.
    pub fn blocks(&self, point: WorldPoint, radius: f32) -> bool {
        if !self.alive {
            return false;
        }
        let closest = WorldPoint::new(
            point
                .x
                .clamp(self.position.x - self.half_extent, self.position.x + self.half_extent),
            point
                .y
                .clamp(self.position.y - self.half_extent, self.position.y + self.half_extent),
        );
        point.distance_squared(closest) < radius * radius
    }
}

/// The player as seen by the agents: a position and whether it can be engaged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub position: WorldPoint,
    pub active: bool,
}

impl Player {
    pub fn inactive() -> Self {
        Self {
            position: WorldPoint::ZERO,
            active: false,
        }
    }

    pub fn at(position: WorldPoint) -> Self {
        Self {
            position,
            active: true,
        }
    }
}

pub struct World {
    grid: Grid,
    pathfinder: Pathfinder,
    walls: Box<dyn ObstacleOracle>,
    stations: Vec<Station>,
    next_station: u32,
}

impl World {
    /// Wraps an already built grid; `walls` must describe the same static geometry.
    pub fn new(grid: Grid, walls: Box<dyn ObstacleOracle>) -> Self {
        Self {
            grid,
            pathfinder: Pathfinder::new(),
            walls,
            stations: Vec::new(),
            next_station: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|station| station.id == id)
    }

    /// Places a station and marks its footprint unwalkable.
    ///
    /// The footprint is half a cell wide, so a station on a cell centre
    /// blocks exactly that cell.
    pub fn add_station(&mut self, position: WorldPoint) -> StationId {
        let id = StationId(self.next_station);
        self.next_station += 1;
        let half_extent = self.grid.config().cell_radius * 0.5;
        self.stations.push(Station::new(id, position, half_extent));
        self.refresh_walkability();
        id
    }

    /// Destroys a station and frees its footprint.
    pub fn destroy_station(&mut self, id: StationId) -> Result<()> {
        let station = self
            .stations
            .iter_mut()
            .find(|station| station.id == id)
            .ok_or(RuntimeError::UnknownStation(id))?;
        if !station.alive {
            return Ok(());
        }
        station.destroy();
        let freed = self.refresh_walkability();
        info!(%id, freed, "station destroyed");
        Ok(())
    }

    /// Re-queries walls and alive stations for every cell; returns how many cells flipped.
    pub fn refresh_walkability(&mut self) -> usize {
        let walls = &self.walls;
        let stations = &self.stations;
        let oracle = |point: WorldPoint, radius: f32| {
            walls.is_blocked(point, radius)
                || stations.iter().any(|station| station.blocks(point, radius))
        };
        self.grid.recompute_walkability(&oracle)
    }

    /// One-off path query against the current walkability.
    pub fn find_path(&mut self, from: WorldPoint, to: WorldPoint) -> Option<Path> {
        self.pathfinder.find_path(&self.grid, from, to)
    }

    pub(crate) fn split(&mut self) -> (&Grid, &mut Pathfinder, &[Station]) {
        (&self.grid, &mut self.pathfinder, &self.stations)
    }
}

#[cfg(test)]
mod tests {
    use game_core::{OpenField, Position, WalkabilityMask};

    use super::*;

    fn world(layout: &str) -> World {
        let grid = Grid::from_layout(layout, 0.5).unwrap();
        let walls = WalkabilityMask::new(grid.clone());
        World::new(grid, Box::new(walls))
    }

    #[test]
    fn stations_block_only_their_own_cell() {
        let mut world = world(".....\n.....\n.....");
        let cell = Position::new(2, 1);
        let id = world.add_station(world.grid().cell_to_world(cell));

        assert!(world.grid().is_blocking(cell));
        assert_eq!(world.grid().walkable_count(), 14);
        assert!(world.station(id).is_some_and(Station::is_alive));
    }

    #[test]
    fn destroying_a_station_frees_its_cell() {
        let mut world = world("..#..\n.....");
        let cell = Position::new(0, 1);
        let id = world.add_station(world.grid().cell_to_world(cell));
        assert!(world.grid().is_blocking(cell));

        world.destroy_station(id).unwrap();
        assert!(world.grid().is_walkable(cell));
        assert!(
            world.grid().is_blocking(Position::new(2, 0)),
            "static walls survive the refresh"
        );
        assert!(world.destroy_station(id).is_ok(), "destroying twice is a no-op");
        assert!(matches!(
            world.destroy_station(StationId(9)),
            Err(RuntimeError::UnknownStation(StationId(9)))
        ));
    }

    #[test]
    fn open_field_walls_refresh_to_fully_walkable() {
        let grid = Grid::from_layout("..\n.#", 0.5).unwrap();
        let mut world = World::new(grid, Box::new(OpenField));
        assert_eq!(world.refresh_walkability(), 1);
        assert_eq!(world.grid().walkable_count(), 4);
    }
}
