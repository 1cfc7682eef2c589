//! A single chase agent: body, perception, planner and state machine.
//!
//! Every tick runs in a fixed order:
//!
//! 1. energy drains by `energy_depletion_rate * dt`,
//! 2. the field of view is recomputed from the agent's cell,
//! 3. the state machine advances one step (skipped under manual control),
//! 4. the agent attacks the player if it is visible and in range.
//!
//! The state machine is a [`StateStack`] with `Idle` at the bottom. `Idle`
//! hands over to `Plan`, which selects a goal and plans for it; `Move` runs
//! the plan's actions one after another and reacts to interrupts by pushing
//! `Plan` on top of itself.

use game_core::{FieldOfView, Grid, Pathfinder, WorldPoint};
use goap::{Action, Plan, Planner, WorldState};
use tracing::{debug, info, warn};

use crate::actions::{AgentAction, AgentContext};
use crate::body::{Body, Energy};
use crate::config::AgentConfig;
use crate::events::{AbortReason, AgentId, SimEvent};
use crate::facts::{Fact, Goal};
use crate::fsm::{AgentState, StateStack};
use crate::rng::RngStream;
use crate::world::{Player, Station};

/// Borrowed view of everything outside the agent for one tick.
pub struct Surroundings<'a> {
    pub grid: &'a Grid,
    pub pathfinder: &'a mut Pathfinder,
    pub stations: &'a [Station],
    pub player: Player,
    pub config: &'a AgentConfig,
    /// Simulation time at the start of this tick, in seconds.
    pub clock: f32,
    pub dt: f32,
    pub events: &'a mut Vec<SimEvent>,
}

pub struct Agent {
    id: AgentId,
    body: Body,
    fov: FieldOfView,
    states: StateStack,
    actions: Vec<AgentAction>,
    planner: Planner<Fact>,
    plan: Plan,
    goal: Option<Goal>,
    last_known_target: Option<WorldPoint>,
    manual: bool,
    last_attack: Option<f32>,
    last_repath: Option<f32>,
    rng: RngStream,
}

impl Agent {
    pub fn new(id: AgentId, position: WorldPoint, energy: Energy, config: &AgentConfig, seed: u64) -> Self {
        Self {
            id,
            body: Body::new(position, energy),
            fov: FieldOfView::new(config.view_radius),
            states: StateStack::new(),
            actions: AgentAction::roster(),
            planner: Planner::new(),
            plan: Plan::default(),
            goal: None,
            last_known_target: None,
            manual: false,
            last_attack: None,
            last_repath: None,
            rng: RngStream::new(seed, id.0),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> WorldPoint {
        self.body.position
    }

    pub fn energy(&self) -> &Energy {
        &self.body.energy
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn fov(&self) -> &FieldOfView {
        &self.fov
    }

    /// State on top of the stack.
    pub fn state(&self) -> AgentState {
        self.states.current()
    }

    pub fn states(&self) -> &StateStack {
        &self.states
    }

    /// Goal of the plan being executed.
    pub fn goal(&self) -> Option<Goal> {
        self.goal
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Names of the remaining plan steps, current one first.
    pub fn plan_names(&self) -> Vec<&'static str> {
        self.plan
            .steps()
            .map(|index| self.actions[index].name())
            .collect()
    }

    pub fn current_action(&self) -> Option<&AgentAction> {
        self.plan.current().map(|index| &self.actions[index])
    }

    pub fn actions(&self) -> &[AgentAction] {
        &self.actions
    }

    pub fn last_known_target(&self) -> Option<WorldPoint> {
        self.last_known_target
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    pub fn is_depleted(&self) -> bool {
        self.body.energy.is_depleted()
    }

    /// Facts as seen by the planner right now.
    pub fn world_state(&self, grid: &Grid, config: &AgentConfig) -> WorldState<Fact> {
        let at_destination = self.last_known_target.is_some_and(|target| {
            grid.world_to_cell(target) == grid.world_to_cell(self.body.position)
        });
        WorldState::new()
            .with(Fact::HasDestination, self.last_known_target.is_some())
            .with(Fact::IsLowOnEnergy, self.body.energy.is_low(config.low_energy_threshold))
            .with(Fact::IsAtDestination, at_destination)
            .with(Fact::HasRoamed, false)
    }

    pub fn update(&mut self, s: &mut Surroundings<'_>) {
        self.body.energy.deplete(s.config.energy_depletion_rate * s.dt);
        self.fov.recompute_from(s.grid, self.body.position);
        let visible = s.player.active && self.fov.sees(s.grid, s.player.position);

        if !self.manual {
            match self.states.current() {
                AgentState::Idle => self.idle(s, visible),
                AgentState::Plan => self.make_plan(s),
                AgentState::Move => self.execute(s, visible),
            }
        }

        self.try_attack(s, visible);
    }

    fn idle(&mut self, s: &Surroundings<'_>, visible: bool) {
        if visible {
            self.last_known_target = Some(s.player.position);
        }
        self.states.push(AgentState::Plan);
    }

    fn make_plan(&mut self, s: &mut Surroundings<'_>) {
        let low = self.body.energy.is_low(s.config.low_energy_threshold);
        let goal = Goal::select(low, self.last_known_target.is_some());
        let initial = self.world_state(s.grid, s.config);

        let found = {
            let mut ctx = context(self.id, &mut self.body, &mut self.rng, self.last_known_target, s);
            self.planner
                .plan(&mut ctx, &mut self.actions, &initial, &goal.state())
        };

        match found {
            Some(plan) => {
                let actions: Vec<&'static str> =
                    plan.steps().map(|index| self.actions[index].name()).collect();
                debug!(agent = %self.id, %goal, ?actions, cost = plan.cost(), "plan found");
                s.events.push(SimEvent::PlanFound {
                    agent: self.id,
                    goal,
                    actions,
                    cost: plan.cost(),
                });
                self.plan = plan;
                self.goal = Some(goal);
                // Planning a chase already routed to the target.
                self.last_repath = (goal == Goal::Chase).then_some(s.clock);
                self.states.pop();
                if self.states.current() != AgentState::Move {
                    self.states.push(AgentState::Move);
                }
            }
            None => {
                debug!(agent = %self.id, %goal, "no plan");
                s.events.push(SimEvent::PlanFailed { agent: self.id, goal });
                self.last_known_target = None;
                self.plan.clear();
                self.goal = None;
                self.states.reset();
            }
        }
    }

    fn execute(&mut self, s: &mut Surroundings<'_>, visible: bool) {
        let Some(index) = self.plan.current() else {
            let goal = self.goal.take();
            if goal == Some(Goal::Chase) {
                self.last_known_target = None;
            }
            if let Some(goal) = goal {
                s.events.push(SimEvent::ActionsFinished { agent: self.id, goal });
            }
            self.states.reset();
            return;
        };

        if self.actions[index].is_done() {
            self.plan.advance();
            return;
        }

        let low = self.body.energy.is_low(s.config.low_energy_threshold);
        if low && self.goal != Some(Goal::Survive) {
            self.abort(s, AbortReason::LowEnergy);
            self.states.push(AgentState::Plan);
            return;
        }

        if visible && !matches!(self.goal, Some(Goal::Survive | Goal::Chase)) {
            self.abort(s, AbortReason::TargetSpotted);
            self.last_known_target = Some(s.player.position);
            self.states.push(AgentState::Plan);
            return;
        }

        if visible && self.goal == Some(Goal::Chase) {
            let target = s.player.position;
            self.last_known_target = Some(target);
            self.follow_target(s, index, target);
        }

        let performed = {
            let mut ctx = context(self.id, &mut self.body, &mut self.rng, self.last_known_target, s);
            self.actions[index].perform(&mut ctx)
        };
        if !performed {
            self.abort(s, AbortReason::ActionFailed);
            if self.goal == Some(Goal::Chase) {
                self.last_known_target = None;
            }
            self.goal = None;
            self.states.reset();
        }
    }

    /// Points a running chase at the target's new position once it has drifted far enough.
    fn follow_target(&mut self, s: &mut Surroundings<'_>, index: usize, target: WorldPoint) {
        let Some(destination) = self.actions[index].destination() else {
            return;
        };
        if destination.distance(target) <= s.config.replan_threshold {
            return;
        }
        if let Some(last) = self.last_repath {
            if s.clock - last < s.config.replan_interval {
                return;
            }
        }
        if self.actions[index].redirect(target) {
            self.last_repath = Some(s.clock);
            debug!(agent = %self.id, x = target.x, y = target.y, "chase redirected");
            s.events.push(SimEvent::Replanned {
                agent: self.id,
                destination: target,
            });
        }
    }

    /// Drops the running plan, letting the current action clean up first.
    fn abort(&mut self, s: &mut Surroundings<'_>, reason: AbortReason) {
        if let Some(index) = self.plan.current() {
            let action = self.actions[index].name();
            {
                let mut ctx = context(self.id, &mut self.body, &mut self.rng, self.last_known_target, s);
                self.actions[index].on_plan_aborted(&mut ctx);
            }
            warn!(agent = %self.id, action, %reason, "plan aborted");
            s.events.push(SimEvent::PlanAborted {
                agent: self.id,
                action,
                reason,
            });
        }
        self.plan.clear();
        self.last_repath = None;
    }

    fn try_attack(&mut self, s: &mut Surroundings<'_>, visible: bool) {
        if !visible || self.body.position.distance(s.player.position) > s.config.attack_range {
            return;
        }
        if let Some(last) = self.last_attack {
            if s.clock - last < s.config.attack_interval {
                return;
            }
        }
        self.last_attack = Some(s.clock);
        debug!(agent = %self.id, "player attacked");
        s.events.push(SimEvent::PlayerAttacked { agent: self.id });
    }

    /// Hands the agent to (or takes it back from) direct control.
    ///
    /// Taking control drops the running plan; releasing it resumes at `Idle`.
    pub fn set_manual(&mut self, s: &mut Surroundings<'_>, manual: bool) {
        if self.manual == manual {
            return;
        }
        if manual {
            self.abort(s, AbortReason::ManualControl);
            self.goal = None;
        }
        self.states.reset();
        self.manual = manual;
        info!(agent = %self.id, manual, "control changed");
    }

    /// Moves a manually controlled agent by `(dx, dy)` if the target cell is walkable.
    ///
    /// Ending within one cell diameter of an alive station refills energy.
    pub fn manual_move(&mut self, s: &Surroundings<'_>, dx: f32, dy: f32) -> bool {
        if !self.manual {
            return false;
        }
        let target = self.body.position.offset(dx, dy);
        if !s.grid.is_walkable(s.grid.world_to_cell(target)) {
            return false;
        }
        self.body.position = target;

        let reach = s.grid.config().cell_diameter();
        let near_station = s
            .stations
            .iter()
            .any(|station| station.is_alive() && station.position().distance(target) <= reach);
        if near_station {
            self.body.energy.replenish();
        }
        true
    }
}

fn context<'a>(
    agent: AgentId,
    body: &'a mut Body,
    rng: &'a mut RngStream,
    last_known_target: Option<WorldPoint>,
    s: &'a mut Surroundings<'_>,
) -> AgentContext<'a> {
    AgentContext {
        agent,
        grid: s.grid,
        pathfinder: &mut *s.pathfinder,
        stations: s.stations,
        config: s.config,
        body,
        rng,
        last_known_target,
        dt: s.dt,
    }
}
