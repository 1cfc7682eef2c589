//! Walking to the nearest energy station and refilling.

use std::cmp::Ordering;

use game_core::{Path, WorldPoint};
use goap::{Action, WorldState};
use tracing::{debug, trace};

use super::AgentContext;
use super::navigation::{PathFollower, Progress};
use crate::events::StationId;
use crate::facts::Fact;
use crate::world::Station;

/// `IsLowOnEnergy = true` → `IsLowOnEnergy = false`.
///
/// Targets the nearest alive station it can reach. Stations stand on blocked
/// cells, so the agent heads for a walkable neighbour of the station's cell.
#[derive(Clone, Debug)]
pub struct Recharge {
    preconditions: WorldState<Fact>,
    effects: WorldState<Fact>,
    follower: PathFollower,
    station: Option<StationId>,
    done: bool,
}

impl Default for Recharge {
    fn default() -> Self {
        Self {
            preconditions: WorldState::new().with(Fact::IsLowOnEnergy, true),
            effects: WorldState::new().with(Fact::IsLowOnEnergy, false),
            follower: PathFollower::new(),
            station: None,
            done: false,
        }
    }
}

impl Recharge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Station picked by the last successful precondition check.
    pub fn station(&self) -> Option<StationId> {
        self.station
    }

    pub fn destination(&self) -> Option<WorldPoint> {
        self.follower.destination()
    }

    pub fn path(&self) -> Option<&Path> {
        self.follower.path()
    }
}

impl<'w> Action<AgentContext<'w>> for Recharge {
    type Fact = Fact;

    fn name(&self) -> &'static str {
        "Recharge"
    }

    fn preconditions(&self) -> &WorldState<Fact> {
        &self.preconditions
    }

    fn effects(&self) -> &WorldState<Fact> {
        &self.effects
    }

    fn check_procedural_precondition(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        let origin = ctx.body.position;
        let mut candidates: Vec<(StationId, WorldPoint)> = ctx
            .stations
            .iter()
            .filter(|station| station.is_alive())
            .map(|station| (station.id(), station.position()))
            .collect();
        candidates.sort_by(|(_, a), (_, b)| {
            origin
                .distance_squared(*a)
                .partial_cmp(&origin.distance_squared(*b))
                .unwrap_or(Ordering::Equal)
        });

        for (id, position) in candidates {
            let cell = ctx.grid.world_to_cell(position);
            let approach = if ctx.grid.is_walkable(cell) {
                Some(position)
            } else {
                ctx.grid
                    .closest_walkable_neighbor(cell)
                    .map(|neighbor| ctx.grid.cell_to_world(neighbor))
            };
            let Some(approach) = approach else {
                trace!(agent = %ctx.agent, station = %id, "station enclosed");
                continue;
            };
            if self.follower.route(ctx, approach) {
                self.station = Some(id);
                return true;
            }
            trace!(agent = %ctx.agent, station = %id, "station unreachable");
        }

        self.follower.reset();
        self.station = None;
        false
    }

    /// Fails as soon as the targeted station is gone.
    fn perform(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        let alive = self
            .station
            .and_then(|id| ctx.stations.iter().find(|station| station.id() == id))
            .is_some_and(Station::is_alive);
        if !alive {
            return false;
        }

        let speed = ctx.config.recharge_speed;
        match self.follower.advance(ctx, speed) {
            Progress::Moving => true,
            Progress::Arrived => {
                ctx.body.energy.replenish();
                debug!(agent = %ctx.agent, station = ?self.station, "recharged");
                self.done = true;
                true
            }
            Progress::Lost => false,
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn requires_in_range(&self) -> bool {
        true
    }

    fn on_plan_aborted(&mut self, _ctx: &mut AgentContext<'w>) {
        self.follower.reset();
        self.station = None;
    }

    fn reset(&mut self) {
        self.follower.reset();
        self.station = None;
        self.done = false;
    }
}

#[cfg(test)]
mod tests {
    use game_core::Position;

    use super::*;
    use crate::actions::fixture::Fixture;
    use crate::body::Energy;

    #[test]
    fn prefers_the_nearest_reachable_station() {
        let mut fixture = Fixture::new(
            "........\n\
             ........\n\
             ........",
            Position::new(0, 1),
        );
        let far = fixture.add_station(Position::new(7, 1));
        let near = fixture.add_station(Position::new(2, 1));
        let mut action = Recharge::new();

        assert!(action.check_procedural_precondition(&mut fixture.context(None)));
        assert_eq!(action.station(), Some(near));
        assert_ne!(action.station(), Some(far));
        let approach = fixture.grid.world_to_cell(action.destination().unwrap());
        assert_eq!(approach.chebyshev_distance(Position::new(2, 1)), 1);
    }

    #[test]
    fn skips_unreachable_stations() {
        let mut fixture = Fixture::new(
            "....#....\n\
             ....#....\n\
             ....#....",
            Position::new(3, 1),
        );
        let _walled_off = fixture.add_station(Position::new(5, 1));
        let reachable = fixture.add_station(Position::new(0, 1));
        let mut action = Recharge::new();

        assert!(action.check_procedural_precondition(&mut fixture.context(None)));
        assert_eq!(action.station(), Some(reachable));

        fixture.stations.retain(|station| station.id() != reachable);
        assert!(!action.check_procedural_precondition(&mut fixture.context(None)));
        assert_eq!(action.station(), None);
    }

    #[test]
    fn arrival_refills_energy() {
        let mut fixture = Fixture::new("......\n......", Position::new(0, 0));
        fixture.body.energy = Energy::with_current(10.0, 100.0);
        fixture.add_station(Position::new(4, 1));
        let mut action = Recharge::new();

        assert!(action.check_procedural_precondition(&mut fixture.context(None)));
        assert!(fixture.run(&mut action, None, 500).is_some());
        assert!(action.is_done());
        assert_eq!(fixture.body.energy.current(), 100.0);
    }

    #[test]
    fn destroyed_station_fails_the_action() {
        let mut fixture = Fixture::new("......\n......", Position::new(0, 0));
        let id = fixture.add_station(Position::new(5, 1));
        let mut action = Recharge::new();
        assert!(action.check_procedural_precondition(&mut fixture.context(None)));
        assert!(action.perform(&mut fixture.context(None)));

        fixture.stations.clear();
        fixture.stations.push({
            let mut station = Station::new(id, fixture.grid.cell_to_world(Position::new(5, 1)), 0.25);
            station.destroy();
            station
        });
        assert!(!action.perform(&mut fixture.context(None)));
    }
}
