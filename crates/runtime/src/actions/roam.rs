//! Wandering to a random nearby point.

use game_core::{Path, WorldPoint};
use goap::{Action, WorldState};
use tracing::trace;

use super::AgentContext;
use super::navigation::{PathFollower, Progress};
use crate::facts::Fact;

/// `HasDestination = false, IsLowOnEnergy = false` → `HasRoamed = true`.
#[derive(Clone, Debug)]
pub struct Roam {
    preconditions: WorldState<Fact>,
    effects: WorldState<Fact>,
    follower: PathFollower,
    done: bool,
}

impl Default for Roam {
    fn default() -> Self {
        Self {
            preconditions: WorldState::new()
                .with(Fact::HasDestination, false)
                .with(Fact::IsLowOnEnergy, false),
            effects: WorldState::new().with(Fact::HasRoamed, true),
            follower: PathFollower::new(),
            done: false,
        }
    }
}

impl Roam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<WorldPoint> {
        self.follower.destination()
    }

    pub fn path(&self) -> Option<&Path> {
        self.follower.path()
    }
}

impl<'w> Action<AgentContext<'w>> for Roam {
    type Fact = Fact;

    fn name(&self) -> &'static str {
        "Roam"
    }

    fn preconditions(&self) -> &WorldState<Fact> {
        &self.preconditions
    }

    fn effects(&self) -> &WorldState<Fact> {
        &self.effects
    }

    /// Draws up to `roam_attempts` points within `roam_radius` and keeps the
    /// first one whose cell is walkable and reachable.
    fn check_procedural_precondition(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        for attempt in 0..ctx.config.roam_attempts {
            let (dx, dy) = ctx.rng.offset_in_disc(ctx.config.roam_radius);
            let cell = ctx.grid.world_to_cell(ctx.body.position.offset(dx, dy));
            if !ctx.grid.is_walkable(cell) {
                trace!(agent = %ctx.agent, attempt, %cell, "roam point blocked");
                continue;
            }
            let point = ctx.grid.cell_to_world(cell);
            if self.follower.route(ctx, point) {
                return true;
            }
            trace!(agent = %ctx.agent, attempt, %cell, "roam point unreachable");
        }
        self.follower.reset();
        false
    }

    fn perform(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        let speed = ctx.config.roam_speed;
        match self.follower.advance(ctx, speed) {
            Progress::Moving => true,
            Progress::Arrived => {
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
    }

    fn reset(&mut self) {
        self.follower.reset();
        self.done = false;
    }
}
