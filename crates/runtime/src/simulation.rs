//! The simulation driver: owns the world, the player and every agent.
//!
//! [`Simulation::step`] advances all agents by one fixed `dt`. Events are
//! buffered and handed out through [`Simulation::drain_events`].

use std::mem;

use game_content::Scenario;
use game_core::{Grid, ObstacleOracle, OpenField, WalkabilityMask, WorldPoint};
use tracing::{debug, info};

use crate::agent::{Agent, Surroundings};
use crate::body::Energy;
use crate::config::{AgentConfig, SimulationConfig};
use crate::error::{Result, RuntimeError};
use crate::events::{AgentId, SimEvent, StationId};
use crate::world::{Player, Station, World};

pub struct Simulation {
    config: SimulationConfig,
    world: World,
    player: Player,
    agents: Vec<Agent>,
    next_agent: u32,
    clock: f32,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::default()
    }

    /// Builds a simulation from a loaded scenario.
    ///
    /// The scenario's layout and generated obstacles define both the grid and
    /// the static walls, so destroying a station never reopens either.
    pub fn from_scenario(scenario: &Scenario, config: SimulationConfig) -> Result<Self> {
        let grid = scenario.build_grid()?;
        let mut builder = Simulation::builder().config(config);
        if let Some(cell) = scenario.player {
            builder = builder.player(grid.cell_to_world(cell));
        }
        for station in &scenario.stations {
            builder = builder.station(grid.cell_to_world(station.cell));
        }
        for agent in &scenario.agents {
            let position = grid.cell_to_world(agent.cell);
            builder = match agent.energy {
                Some(energy) => builder.agent_with_energy(position, energy),
                None => builder.agent(position),
            };
        }
        info!(name = %scenario.name, "scenario loaded");
        builder.grid(grid).build()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seconds simulated so far.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn grid(&self) -> &Grid {
        self.world.grid()
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn set_player_position(&mut self, position: WorldPoint) {
        self.player.position = position;
    }

    /// An inactive player is never perceived or attacked.
    pub fn set_player_active(&mut self, active: bool) {
        self.player.active = active;
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id() == id)
    }

    pub fn stations(&self) -> &[Station] {
        self.world.stations()
    }

    /// Advances every agent by `dt` seconds.
    ///
    /// Agents whose energy runs out during the step are removed after it.
    pub fn step(&mut self, dt: f32) {
        if self.config.refresh_walkability_every_tick {
            self.world.refresh_walkability();
        }

        for agent in &mut self.agents {
            let mut s = surroundings(
                &mut self.world,
                self.player,
                &self.config.agent,
                self.clock,
                dt,
                &mut self.events,
            );
            agent.update(&mut s);
        }

        let events = &mut self.events;
        self.agents.retain(|agent| {
            if !agent.is_depleted() {
                return true;
            }
            info!(agent = %agent.id(), "agent depleted");
            events.push(SimEvent::AgentDepleted { agent: agent.id() });
            false
        });

        self.clock += dt;
    }

    /// Adds an agent with full energy at `point`, snapped off walls if needed.
    pub fn spawn_agent(&mut self, point: WorldPoint) -> Result<AgentId> {
        let max = self.config.agent.max_energy;
        self.spawn(point, Energy::new(max))
    }

    fn spawn(&mut self, point: WorldPoint, energy: Energy) -> Result<AgentId> {
        let grid = self.world.grid();
        let position = if grid.is_walkable(grid.world_to_cell(point)) {
            point
        } else {
            let cell = grid
                .nearest_walkable(point)
                .ok_or(RuntimeError::NoWalkableSpawn { point })?;
            grid.cell_to_world(cell)
        };

        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        self.agents.push(Agent::new(
            id,
            position,
            energy,
            &self.config.agent,
            self.config.seed,
        ));
        debug!(agent = %id, x = position.x, y = position.y, "agent spawned");
        Ok(id)
    }

    pub fn remove_agent(&mut self, id: AgentId) -> Result<()> {
        let index = self.index_of(id)?;
        self.agents.remove(index);
        Ok(())
    }

    pub fn add_station(&mut self, position: WorldPoint) -> StationId {
        self.world.add_station(position)
    }

    /// Destroys a station, frees its footprint and reports it.
    pub fn destroy_station(&mut self, id: StationId) -> Result<()> {
        let was_alive = self.world.station(id).is_some_and(Station::is_alive);
        self.world.destroy_station(id)?;
        if was_alive {
            self.events.push(SimEvent::StationDestroyed { station: id });
        }
        Ok(())
    }

    /// Re-queries walls and stations for every cell; returns how many cells changed.
    pub fn refresh_walkability(&mut self) -> usize {
        self.world.refresh_walkability()
    }

    pub fn set_manual_control(&mut self, id: AgentId, manual: bool) -> Result<()> {
        let index = self.index_of(id)?;
        let mut s = surroundings(
            &mut self.world,
            self.player,
            &self.config.agent,
            self.clock,
            0.0,
            &mut self.events,
        );
        self.agents[index].set_manual(&mut s, manual);
        Ok(())
    }

    /// Moves a manually controlled agent. Returns whether it moved.
    pub fn manual_move(&mut self, id: AgentId, dx: f32, dy: f32) -> Result<bool> {
        let index = self.index_of(id)?;
        let s = surroundings(
            &mut self.world,
            self.player,
            &self.config.agent,
            self.clock,
            0.0,
            &mut self.events,
        );
        Ok(self.agents[index].manual_move(&s, dx, dy))
    }

    /// Takes every event raised since the previous drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        mem::take(&mut self.events)
    }

    fn index_of(&self, id: AgentId) -> Result<usize> {
        self.agents
            .iter()
            .position(|agent| agent.id() == id)
            .ok_or(RuntimeError::UnknownAgent(id))
    }
}

fn surroundings<'a>(
    world: &'a mut World,
    player: Player,
    config: &'a AgentConfig,
    clock: f32,
    dt: f32,
    events: &'a mut Vec<SimEvent>,
) -> Surroundings<'a> {
    let (grid, pathfinder, stations) = world.split();
    Surroundings {
        grid,
        pathfinder,
        stations,
        player,
        config,
        clock,
        dt,
        events,
    }
}

/// Assembles a [`Simulation`].
///
/// Without an explicit grid one is built from `config.grid` against the
/// obstacle oracle (an open field by default). With an explicit grid and no
/// oracle, the grid's own walkability becomes the static wall layer.
#[derive(Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    grid: Option<Grid>,
    obstacles: Option<Box<dyn ObstacleOracle>>,
    player: Option<WorldPoint>,
    stations: Vec<WorldPoint>,
    agents: Vec<(WorldPoint, Option<f32>)>,
}

impl SimulationBuilder {
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn obstacles(mut self, oracle: impl ObstacleOracle + 'static) -> Self {
        self.obstacles = Some(Box::new(oracle));
        self
    }

    /// Places an active player.
    pub fn player(mut self, position: WorldPoint) -> Self {
        self.player = Some(position);
        self
    }

    pub fn station(mut self, position: WorldPoint) -> Self {
        self.stations.push(position);
        self
    }

    pub fn agent(mut self, position: WorldPoint) -> Self {
        self.agents.push((position, None));
        self
    }

    pub fn agent_with_energy(mut self, position: WorldPoint, energy: f32) -> Self {
        self.agents.push((position, Some(energy)));
        self
    }

    pub fn build(self) -> Result<Simulation> {
        let (grid, walls) = match self.grid {
            Some(grid) => {
                let walls: Box<dyn ObstacleOracle> = match self.obstacles {
                    Some(walls) => walls,
                    None => Box::new(WalkabilityMask::new(grid.clone())),
                };
                (grid, walls)
            }
            None => {
                let walls: Box<dyn ObstacleOracle> = match self.obstacles {
                    Some(walls) => walls,
                    None => Box::new(OpenField),
                };
                let grid = Grid::build(self.config.grid.clone(), walls.as_ref())?;
                (grid, walls)
            }
        };
        info!(
            width = grid.width(),
            height = grid.height(),
            walkable = grid.walkable_count(),
            "grid ready"
        );

        let mut world = World::new(grid, walls);
        for position in self.stations {
            world.add_station(position);
        }

        let player = match self.player {
            Some(position) => Player::at(position),
            None => Player::inactive(),
        };

        let mut simulation = Simulation {
            config: self.config,
            world,
            player,
            agents: Vec::new(),
            next_agent: 0,
            clock: 0.0,
            events: Vec::new(),
        };
        for (position, energy) in self.agents {
            let max = simulation.config.agent.max_energy;
            let energy = match energy {
                Some(current) => Energy::with_current(current, max),
                None => Energy::new(max),
            };
            simulation.spawn(position, energy)?;
        }
        Ok(simulation)
    }
}

#[cfg(test)]
mod tests {
    use game_core::Position;

    use super::*;

    fn layout_simulation(layout: &str) -> Simulation {
        let grid = Grid::from_layout(layout, 0.5).unwrap();
        Simulation::builder().grid(grid).build().unwrap()
    }

    #[test]
    fn spawns_are_snapped_off_walls() {
        let mut sim = layout_simulation("..#\n...");
        let wall = sim.grid().cell_to_world(Position::new(2, 0));
        let id = sim.spawn_agent(wall).unwrap();
        let agent = sim.agent(id).unwrap();
        assert!(sim.grid().is_walkable(sim.grid().world_to_cell(agent.position())));
        assert_ne!(agent.position(), wall);
    }

    #[test]
    fn enclosed_spawn_points_are_rejected() {
        let mut sim = layout_simulation("###\n###\n###");
        let center = sim.grid().cell_to_world(Position::new(1, 1));
        assert!(matches!(
            sim.spawn_agent(center),
            Err(RuntimeError::NoWalkableSpawn { .. })
        ));
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut sim = layout_simulation("...");
        assert!(matches!(
            sim.remove_agent(AgentId(3)),
            Err(RuntimeError::UnknownAgent(AgentId(3)))
        ));
        assert!(matches!(
            sim.set_manual_control(AgentId(3), true),
            Err(RuntimeError::UnknownAgent(_))
        ));
        assert!(matches!(
            sim.destroy_station(StationId(0)),
            Err(RuntimeError::UnknownStation(_))
        ));
    }

    #[test]
    fn depleted_agents_are_removed() {
        let grid = Grid::from_layout("....", 0.5).unwrap();
        let start = grid.cell_to_world(Position::new(0, 0));
        let mut sim = Simulation::builder()
            .grid(grid)
            .agent_with_energy(start, 0.05)
            .build()
            .unwrap();

        sim.step(0.1);
        assert!(sim.agents().is_empty());
        assert_eq!(
            sim.drain_events().last(),
            Some(&SimEvent::AgentDepleted { agent: AgentId(0) })
        );
        assert!((sim.clock() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn destroying_a_station_is_reported_once() {
        let mut sim = layout_simulation("...");
        let id = sim.add_station(sim.grid().cell_to_world(Position::new(2, 0)));
        sim.destroy_station(id).unwrap();
        sim.destroy_station(id).unwrap();
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::StationDestroyed { station: id }]
        );
        assert!(sim.drain_events().is_empty());
    }
}
