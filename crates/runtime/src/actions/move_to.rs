//! Chase movement towards the last known target position.

use goap::{Action, WorldState};

use super::AgentContext;
use super::navigation::{PathFollower, Progress};
use crate::facts::Fact;
use game_core::{Path, WorldPoint};

/// `HasDestination = true` → `IsAtDestination = true`.
///
/// Usable only while the agent has a last known target position that it can
/// path to. While chasing, the destination can be redirected in place as the
/// target moves.
#[derive(Clone, Debug)]
pub struct MoveTo {
    preconditions: WorldState<Fact>,
    effects: WorldState<Fact>,
    follower: PathFollower,
    done: bool,
}

impl Default for MoveTo {
    fn default() -> Self {
        Self {
            preconditions: WorldState::new().with(Fact::HasDestination, true),
            effects: WorldState::new().with(Fact::IsAtDestination, true),
            follower: PathFollower::new(),
            done: false,
        }
    }
}

impl MoveTo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<WorldPoint> {
        self.follower.destination()
    }

    pub fn path(&self) -> Option<&Path> {
        self.follower.path()
    }

    pub fn redirect(&mut self, destination: WorldPoint) {
        self.follower.redirect(destination);
    }
}

impl<'w> Action<AgentContext<'w>> for MoveTo {
    type Fact = Fact;

    fn name(&self) -> &'static str {
        "MoveTo"
    }

    fn preconditions(&self) -> &WorldState<Fact> {
        &self.preconditions
    }

    fn effects(&self) -> &WorldState<Fact> {
        &self.effects
    }

    fn check_procedural_precondition(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        match ctx.last_known_target {
            Some(target) => self.follower.route(ctx, target),
            None => false,
        }
    }

    fn perform(&mut self, ctx: &mut AgentContext<'w>) -> bool {
        let speed = ctx.config.chase_speed;
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

#[cfg(test)]
mod tests {
    use game_core::Position;

    use super::*;
    use crate::actions::fixture::Fixture;

    #[test]
    fn needs_a_reachable_last_known_position() {
        let mut fixture = Fixture::new("...#.\n...#.", Position::new(0, 0));
        let mut action = MoveTo::new();

        assert!(!action.check_procedural_precondition(&mut fixture.context(None)));

        let walled_off = fixture.grid.cell_to_world(Position::new(4, 1));
        assert!(!action.check_procedural_precondition(&mut fixture.context(Some(walled_off))));

        let reachable = fixture.grid.cell_to_world(Position::new(2, 1));
        assert!(action.check_procedural_precondition(&mut fixture.context(Some(reachable))));
        assert_eq!(action.destination(), Some(reachable));
    }

    #[test]
    fn walks_to_the_target_and_finishes() {
        let mut fixture = Fixture::new("....\n....\n....", Position::new(0, 0));
        let target = fixture.grid.cell_to_world(Position::new(3, 2));
        let mut action = MoveTo::new();

        assert!(action.check_procedural_precondition(&mut fixture.context(Some(target))));
        let ticks = fixture.run(&mut action, Some(target), 200);
        assert!(ticks.is_some());
        assert!(action.is_done());
        assert_eq!(fixture.body.position, target);
    }

    #[test]
    fn abort_and_reset_are_idempotent() {
        let mut fixture = Fixture::new("...", Position::new(0, 0));
        let mut action = MoveTo::new();
        action.on_plan_aborted(&mut fixture.context(None));
        action.on_plan_aborted(&mut fixture.context(None));
        action.reset();
        assert_eq!(action.destination(), None);
        assert!(!action.is_done());
    }
}
