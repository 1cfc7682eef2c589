//! Concrete GOAP actions of the chase agent.
//!
//! Each action implements [`goap::Action`] over an [`AgentContext`], the
//! per-tick view of the world an agent is allowed to touch. The
//! [`AgentAction`] enum closes the roster so it can be planned over without
//! boxing.

mod move_to;
mod navigation;
mod recharge;
mod roam;

use game_core::{Grid, Path, Pathfinder, WorldPoint};
use goap::{Action, WorldState};

use crate::body::Body;
use crate::config::AgentConfig;
use crate::events::AgentId;
use crate::facts::Fact;
use crate::rng::RngStream;
use crate::world::Station;

pub use move_to::MoveTo;
pub use navigation::{PathFollower, Progress};
pub use recharge::Recharge;
pub use roam::Roam;

/// Everything an action may read or change during one call.
///
/// Built fresh for every planning attempt and every tick from disjoint
/// borrows of the agent and the world.
pub struct AgentContext<'w> {
    pub agent: AgentId,
    pub grid: &'w Grid,
    pub pathfinder: &'w mut Pathfinder,
    pub stations: &'w [Station],
    pub config: &'w AgentConfig,
    pub body: &'w mut Body,
    pub rng: &'w mut RngStream,
    /// Position being pursued, if any.
    pub last_known_target: Option<WorldPoint>,
    /// Seconds covered by the current tick.
    pub dt: f32,
}

#[derive(Clone, Debug)]
pub enum AgentAction {
    MoveTo(MoveTo),
    Roam(Roam),
    Recharge(Recharge),
}

macro_rules! dispatch {
    ($self:expr, $action:ident => $body:expr) => {
        match $self {
            AgentAction::MoveTo($action) => $body,
            AgentAction::Roam($action) => $body,
            AgentAction::Recharge($action) => $body,
        }
    };
}

impl AgentAction {
    /// Full roster every agent starts with, in planning order.
    pub fn roster() -> Vec<AgentAction> {
        vec![
            AgentAction::MoveTo(MoveTo::new()),
            AgentAction::Roam(Roam::new()),
            AgentAction::Recharge(Recharge::new()),
        ]
    }

    pub fn name(&self) -> &'static str {
        dispatch!(self, action => Action::<AgentContext<'_>>::name(action))
    }

    pub fn is_done(&self) -> bool {
        dispatch!(self, action => Action::<AgentContext<'_>>::is_done(action))
    }

    /// Where the action is currently heading.
    pub fn destination(&self) -> Option<WorldPoint> {
        dispatch!(self, action => action.destination())
    }

    /// Path currently being followed.
    pub fn path(&self) -> Option<&Path> {
        dispatch!(self, action => action.path())
    }

    /// Moves the destination of a chase in place. Other actions ignore it.
    pub fn redirect(&mut self, destination: WorldPoint) -> bool {
        match self {
            AgentAction::MoveTo(action) => {
                action.redirect(destination);
                true
            }
            AgentAction::Roam(_) | AgentAction::Recharge(_) => false,
        }
    }
}

impl<'w> Action<AgentContext<'w>> for AgentAction {
    type Fact = Fact;

    fn name(&self) -> &'static str {
        AgentAction::name(self)
    }

    fn cost(&self) -> u32 {
        dispatch!(self, action => Action::<AgentContext<'w>>::cost(action))
    }

    fn preconditions(&self) -> &WorldState<Fact> {
        dispatch!(self, action => Action::<AgentContext<'w>>::preconditions(action))
    }

    fn effects(&self) -> &WorldState<Fact> {
        dispatch!(self, action => Action::<AgentContext<'w>>::effects(action))
    }

    fn check_procedural_precondition(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        dispatch!(self, action => action.check_procedural_precondition(ctx))
    }

    fn perform(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        dispatch!(self, action => action.perform(ctx))
    }

    fn is_done(&self) -> bool {
        AgentAction::is_done(self)
    }

    fn requires_in_range(&self) -> bool {
        dispatch!(self, action => Action::<AgentContext<'w>>::requires_in_range(action))
    }

    fn on_plan_aborted(&mut self, ctx: &mut AgentContext<'w>) {
        dispatch!(self, action => action.on_plan_aborted(ctx))
    }

    fn reset(&mut self) {
        dispatch!(self, action => Action::<AgentContext<'w>>::reset(action))
    }
}
