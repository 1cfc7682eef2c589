//! Waypoint following shared by every moving action.

use game_core::{Path, Position, WorldPoint};

use super::AgentContext;

/// Outcome of one [`PathFollower::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Moving,
    Arrived,
    /// No destination, or the destination cannot be reached.
    Lost,
}

/// A destination plus the path towards it and how far along it the agent is.
///
/// The destination is a plain position owned by the action; nothing is
/// allocated in the world to mark it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathFollower {
    destination: Option<WorldPoint>,
    path: Option<Path>,
    index: usize,
}

impl PathFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<WorldPoint> {
        self.destination
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Cells still ahead of the agent.
    pub fn remaining(&self) -> &[Position] {
        self.path
            .as_ref()
            .and_then(|path| path.cells().get(self.index..))
            .unwrap_or(&[])
    }

    /// Sets a destination and paths to it from the agent's position.
    ///
    /// Returns `false` when the destination is unreachable.
    pub fn route(&mut self, ctx: &mut AgentContext<'_>, destination: WorldPoint) -> bool {
        self.destination = Some(destination);
        self.index = 0;
        self.path = ctx
            .pathfinder
            .find_path(ctx.grid, ctx.body.position, destination);
        self.path.is_some()
    }

    /// Swaps the destination; the path is recomputed on the next advance.
    pub fn redirect(&mut self, destination: WorldPoint) {
        self.destination = Some(destination);
        self.path = None;
        self.index = 0;
    }

    /// Moves the agent towards the next waypoint at `speed` units per second.
    pub fn advance(&mut self, ctx: &mut AgentContext<'_>, speed: f32) -> Progress {
        let Some(destination) = self.destination else {
            return Progress::Lost;
        };
        if self.path.is_none() {
            match ctx
                .pathfinder
                .find_path(ctx.grid, ctx.body.position, destination)
            {
                Some(path) => self.path = Some(path),
                None => return Progress::Lost,
            }
        }

        let next = self
            .path
            .as_ref()
            .and_then(|path| path.cells().get(self.index).copied());
        let Some(cell) = next else {
            return Progress::Arrived;
        };

        let waypoint = ctx.grid.cell_to_world(cell);
        ctx.body.position = ctx.body.position.move_towards(waypoint, speed * ctx.dt);
        if ctx.body.position.distance(waypoint) < ctx.config.arrival_tolerance {
            self.index += 1;
        }
        Progress::Moving
    }

    pub fn reset(&mut self) {
        self.destination = None;
        self.path = None;
        self.index = 0;
    }
}
